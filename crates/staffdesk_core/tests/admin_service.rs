use staffdesk_core::{
    AdminService, Dataset, DocumentStore, EmployeeUpdate, JsonBinStore, NewEmployee, NewPayslip,
    NewStore, PortalRepository, RemoteStoreConfig, ServiceError, SqliteDocumentStore,
    StoreFilter, ValidationError,
};
use std::time::Duration;

const DRIVE_LINK: &str = "https://drive.google.com/file/d/1AbC/view";

fn seeded_repo(store: &SqliteDocumentStore) -> PortalRepository<&SqliteDocumentStore> {
    PortalRepository::open(store)
}

fn new_employee(id: &str, name: &str, store_id: &str) -> NewEmployee {
    NewEmployee {
        id: id.to_string(),
        name: name.to_string(),
        store_id: store_id.to_string(),
        password: format!("{id}-pw"),
    }
}

fn new_payslip(store_id: &str, employee_id: &str, month: &str) -> NewPayslip {
    NewPayslip {
        store_id: store_id.to_string(),
        employee_id: employee_id.to_string(),
        month: month.to_string(),
        link: DRIVE_LINK.to_string(),
    }
}

/// Seed plus two riomar employees, one patteo employee and three payslips.
fn populated(repo: &mut PortalRepository<&SqliteDocumentStore>) {
    let mut admin = AdminService::new(repo);
    admin.add_employee(&new_employee("1001", "Ana", "riomar")).unwrap();
    admin.add_employee(&new_employee("1002", "Bruno", "riomar")).unwrap();
    admin.add_employee(&new_employee("2001", "Carla", "patteo")).unwrap();
    admin
        .add_payslip_at(&new_payslip("riomar", "1001", "2023-05"), 1_000)
        .unwrap();
    admin
        .add_payslip_at(&new_payslip("riomar", "1002", "2023-05"), 2_000)
        .unwrap();
    admin
        .add_payslip_at(&new_payslip("patteo", "2001", "2023-06"), 3_000)
        .unwrap();
}

#[test]
fn add_store_normalizes_code_and_persists() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let mut repo = seeded_repo(&store);
    let mut admin = AdminService::new(&mut repo);

    let created = admin
        .add_store(&NewStore {
            name: "Olinda Shopping".to_string(),
            code: " Olinda Shop ".to_string(),
        })
        .unwrap();
    assert_eq!(created.id, "olindashop");
    assert_eq!(created.employee_count(), 0);
    assert_eq!(admin.snapshot().stores.len(), 7);

    let persisted = store.fetch().unwrap();
    assert_eq!(persisted["stores"][6]["id"], "olindashop");
}

#[test]
fn add_store_rejects_blank_fields_and_duplicates() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let mut repo = seeded_repo(&store);
    let before = repo.snapshot().clone();
    let mut admin = AdminService::new(&mut repo);

    let blank = admin.add_store(&NewStore {
        name: "  ".to_string(),
        code: "x".to_string(),
    });
    assert_eq!(
        blank.unwrap_err(),
        ServiceError::Validation(ValidationError::MissingField("name"))
    );

    let duplicate = admin.add_store(&NewStore {
        name: "Rio Mar".to_string(),
        code: "RIO MAR".to_string(),
    });
    assert_eq!(
        duplicate.unwrap_err(),
        ServiceError::DuplicateStoreCode("riomar".to_string())
    );
    assert_eq!(admin.snapshot(), &before);
}

#[test]
fn delete_store_with_employees_is_rejected_without_changes() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let mut repo = seeded_repo(&store);
    populated(&mut repo);
    let before = repo.snapshot().clone();
    let persisted_before = store.fetch().unwrap();

    let mut admin = AdminService::new(&mut repo);
    let err = admin.delete_store("riomar").unwrap_err();
    assert_eq!(
        err,
        ServiceError::StoreHasEmployees {
            store_id: "riomar".to_string(),
            employees: 2,
        }
    );
    assert_eq!(admin.snapshot(), &before);
    assert_eq!(store.fetch().unwrap(), persisted_before);
}

#[test]
fn delete_empty_store_cascades_to_its_payslips() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let mut repo = seeded_repo(&store);
    populated(&mut repo);

    let mut admin = AdminService::new(&mut repo);
    admin.delete_employee("2001").unwrap();
    // Re-add an orphaned payslip filed under patteo to prove the store cascade.
    let mut next = admin.snapshot().clone();
    let mut orphan = next.payslips[0].clone();
    orphan.id = "orphan".to_string();
    orphan.store_id = "patteo".to_string();
    next.payslips.push(orphan);
    drop(admin);
    assert!(repo.save_dataset(next));

    let mut admin = AdminService::new(&mut repo);
    admin.delete_store("patteo").unwrap();

    let after = admin.snapshot();
    assert!(after.find_store("patteo").is_none());
    assert!(after.payslips.iter().all(|p| p.store_id != "patteo"));
    assert_eq!(after.payslips.len(), 2);
    assert_eq!(after.employees.len(), 3);
}

#[test]
fn delete_unknown_store_is_not_found() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let mut repo = seeded_repo(&store);
    let mut admin = AdminService::new(&mut repo);
    assert_eq!(
        admin.delete_store("nowhere").unwrap_err(),
        ServiceError::StoreNotFound("nowhere".to_string())
    );
}

#[test]
fn add_employee_updates_headcount_and_rejects_duplicates() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let mut repo = seeded_repo(&store);
    let mut admin = AdminService::new(&mut repo);

    admin.add_employee(&new_employee("1001", "Ana", "riomar")).unwrap();
    assert_eq!(
        admin.snapshot().find_store("riomar").unwrap().employee_count(),
        1
    );

    let before = admin.snapshot().clone();
    let dup = admin.add_employee(&new_employee("1001", "Outra Ana", "patteo"));
    assert_eq!(
        dup.unwrap_err(),
        ServiceError::DuplicateEmployeeId("1001".to_string())
    );
    let admin_clash = admin.add_employee(&new_employee("admin", "Impostor", "patteo"));
    assert!(matches!(
        admin_clash,
        Err(ServiceError::DuplicateEmployeeId(_))
    ));
    assert_eq!(admin.snapshot(), &before);
}

#[test]
fn add_employee_requires_all_fields_and_known_store() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let mut repo = seeded_repo(&store);
    let mut admin = AdminService::new(&mut repo);

    let mut missing_password = new_employee("1001", "Ana", "riomar");
    missing_password.password = String::new();
    assert_eq!(
        admin.add_employee(&missing_password).unwrap_err(),
        ServiceError::Validation(ValidationError::MissingField("password"))
    );

    assert_eq!(
        admin
            .add_employee(&new_employee("1001", "Ana", "atlantis"))
            .unwrap_err(),
        ServiceError::StoreNotFound("atlantis".to_string())
    );
    assert_eq!(admin.snapshot().employees.len(), 1);
}

#[test]
fn edit_employee_keeps_password_when_blank_and_moves_headcount() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let mut repo = seeded_repo(&store);
    populated(&mut repo);
    let mut admin = AdminService::new(&mut repo);

    let edited = admin
        .edit_employee(
            "1001",
            &EmployeeUpdate {
                name: "Ana Maria".to_string(),
                store_id: "patteo".to_string(),
                password: "   ".to_string(),
            },
        )
        .unwrap();
    assert_eq!(edited.name, "Ana Maria");
    assert_eq!(edited.password, "1001-pw");

    let snapshot = admin.snapshot();
    assert_eq!(snapshot.find_store("riomar").unwrap().employee_count(), 1);
    assert_eq!(snapshot.find_store("patteo").unwrap().employee_count(), 2);

    let replaced = admin
        .edit_employee(
            "1001",
            &EmployeeUpdate {
                name: "Ana Maria".to_string(),
                store_id: "patteo".to_string(),
                password: "fresh".to_string(),
            },
        )
        .unwrap();
    assert_eq!(replaced.password, "fresh");
}

#[test]
fn edit_employee_rejects_missing_name_store_or_target() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let mut repo = seeded_repo(&store);
    populated(&mut repo);
    let before = repo.snapshot().clone();
    let mut admin = AdminService::new(&mut repo);

    let no_store = EmployeeUpdate {
        name: "Ana".to_string(),
        store_id: String::new(),
        password: String::new(),
    };
    assert_eq!(
        admin.edit_employee("1001", &no_store).unwrap_err(),
        ServiceError::Validation(ValidationError::MissingField("store_id"))
    );

    let valid = EmployeeUpdate {
        name: "Ghost".to_string(),
        store_id: "riomar".to_string(),
        password: String::new(),
    };
    assert_eq!(
        admin.edit_employee("9999", &valid).unwrap_err(),
        ServiceError::EmployeeNotFound("9999".to_string())
    );
    assert_eq!(admin.snapshot(), &before);
}

#[test]
fn edit_employee_refuses_admin_account() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let mut repo = seeded_repo(&store);
    let before = repo.snapshot().clone();
    let mut admin = AdminService::new(&mut repo);

    let attach = EmployeeUpdate {
        name: "Administrador".to_string(),
        store_id: "riomar".to_string(),
        password: String::new(),
    };
    assert_eq!(
        admin.edit_employee("admin", &attach).unwrap_err(),
        ServiceError::EmployeeNotFound("admin".to_string())
    );
    assert_eq!(admin.snapshot(), &before);
    assert!(admin.snapshot().find_employee("admin").unwrap().store_id.is_empty());

    admin.delete_store("riomar").unwrap();
    assert!(admin.snapshot().find_store("riomar").is_none());
}

#[test]
fn delete_employee_removes_only_their_payslips() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let mut repo = seeded_repo(&store);
    populated(&mut repo);
    let before = repo.snapshot().clone();
    let mut admin = AdminService::new(&mut repo);

    admin.delete_employee("1001").unwrap();

    let after = admin.snapshot();
    assert!(after.find_employee("1001").is_none());
    assert_eq!(after.employees.len(), before.employees.len() - 1);
    assert!(after.payslips.iter().all(|p| p.employee_id != "1001"));
    assert_eq!(after.payslips.len(), before.payslips.len() - 1);
    assert_eq!(after.find_store("riomar").unwrap().employee_count(), 1);
    for employee in &after.employees {
        assert_eq!(Some(employee), before.find_employee(&employee.id));
    }
}

#[test]
fn add_payslip_formats_month_and_copies_employee_store() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let mut repo = seeded_repo(&store);
    populated(&mut repo);
    let mut admin = AdminService::new(&mut repo);

    let payslip = admin
        .add_payslip_at(&new_payslip("riomar", "1001", "2023-05"), 1_000)
        .unwrap();
    assert_eq!(payslip.month, "Maio/2023");
    assert_eq!(payslip.store_id, "riomar");
    assert_eq!(payslip.pdf_link, DRIVE_LINK);
    // 1000 is taken by the fixture payslip.
    assert_eq!(payslip.id, "1001");
    assert_eq!(
        admin
            .snapshot()
            .payslips_in_store(StoreFilter::Store("riomar"))
            .len(),
        3
    );
}

#[test]
fn add_payslip_rejects_bad_input_without_writing() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let mut repo = seeded_repo(&store);
    populated(&mut repo);
    let before = repo.snapshot().clone();
    let mut admin = AdminService::new(&mut repo);

    let mut foreign_link = new_payslip("riomar", "1001", "2023-05");
    foreign_link.link = "https://example.com/holerite.pdf".to_string();
    assert!(matches!(
        admin.add_payslip_at(&foreign_link, 9_000),
        Err(ServiceError::Validation(ValidationError::UnapprovedLink(_)))
    ));

    assert!(matches!(
        admin.add_payslip_at(&new_payslip("riomar", "1001", "2023-13"), 9_000),
        Err(ServiceError::Validation(ValidationError::InvalidMonth(_)))
    ));

    assert_eq!(
        admin
            .add_payslip_at(&new_payslip("riomar", "", "2023-05"), 9_000)
            .unwrap_err(),
        ServiceError::Validation(ValidationError::MissingField("employee_id"))
    );

    assert_eq!(
        admin
            .add_payslip_at(&new_payslip("patteo", "1001", "2023-05"), 9_000)
            .unwrap_err(),
        ServiceError::EmployeeNotInStore {
            employee_id: "1001".to_string(),
            store_id: "patteo".to_string(),
        }
    );

    assert!(matches!(
        admin.add_payslip_at(&new_payslip("riomar", "admin", "2023-05"), 9_000),
        Err(ServiceError::EmployeeNotInStore { .. })
    ));

    assert_eq!(
        admin
            .add_payslip_at(&new_payslip("riomar", "7777", "2023-05"), 9_000)
            .unwrap_err(),
        ServiceError::EmployeeNotFound("7777".to_string())
    );

    assert_eq!(admin.snapshot(), &before);
}

#[test]
fn delete_payslip_touches_nothing_else() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let mut repo = seeded_repo(&store);
    populated(&mut repo);
    let before = repo.snapshot().clone();
    let mut admin = AdminService::new(&mut repo);

    admin.delete_payslip("2000").unwrap();
    let after = admin.snapshot();
    assert!(after.find_payslip("2000").is_none());
    assert_eq!(after.payslips.len(), 2);
    assert_eq!(after.employees, before.employees);
    assert_eq!(after.stores, before.stores);

    assert_eq!(
        admin.delete_payslip("2000").unwrap_err(),
        ServiceError::PayslipNotFound("2000".to_string())
    );
}

#[test]
fn persistence_failure_surfaces_and_keeps_snapshot() {
    let config = RemoteStoreConfig::new("test-bin", "test-key")
        .unwrap()
        .with_base_url("http://127.0.0.1:1")
        .unwrap()
        .with_timeout(Some(Duration::from_secs(2)));
    let mut repo = PortalRepository::open(JsonBinStore::new(config).unwrap());
    assert_eq!(repo.snapshot(), &Dataset::seed());

    let mut admin = AdminService::new(&mut repo);
    let err = admin
        .add_store(&NewStore {
            name: "Olinda".to_string(),
            code: "olinda".to_string(),
        })
        .unwrap_err();
    assert_eq!(err, ServiceError::PersistFailed);
    assert_eq!(admin.snapshot(), &Dataset::seed());
}
