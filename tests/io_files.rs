#![forbid(unsafe_code)]
use chrono::NaiveDate;
use grafik::generator::validate_coverage;
use grafik::{
    generate_schedule, io, Constraint, EmployeeId, JsonStorage, ManualConstraints, MonthRef,
    ShiftRequirements, Storage,
};
use std::fs;
use tempfile::tempdir;

#[test]
fn import_employees_from_csv() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("employees.csv");
    fs::write(
        &path,
        "id,department,does_not_work_on_saturdays,termination_date\n\
         1,Stacja,true,\n\
         2,Stacja,,\n\
         3,Biuro,no,2024-01-15\n",
    )
    .unwrap();

    let employees = io::import_employees(&path).unwrap();
    assert_eq!(employees.len(), 3);
    assert!(employees[0].does_not_work_on_saturdays);
    assert!(!employees[1].does_not_work_on_saturdays);
    assert_eq!(employees[2].department, "Biuro");
    assert_eq!(
        employees[2].termination_date,
        NaiveDate::from_ymd_opt(2024, 1, 15)
    );
}

#[test]
fn import_employees_rejects_bad_flag() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("employees.csv");
    fs::write(&path, "id,department,does_not_work_on_saturdays\n1,Stacja,maybe\n").unwrap();

    assert!(io::import_employees_csv(&path).is_err());
}

#[test]
fn import_employees_from_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("employees.json");
    fs::write(
        &path,
        r#"[{"id": 1715000000000, "department": "Stacja", "noSaturdays": true}]"#,
    )
    .unwrap();

    let employees = io::import_employees(&path).unwrap();
    assert_eq!(employees[0].id, EmployeeId::new("1715000000000"));
    assert!(employees[0].does_not_work_on_saturdays);
}

#[test]
fn import_constraints_matrix() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("constraints.csv");
    fs::write(&path, "employee_id,1,2,3\n2,0,,U\n3,,U\n").unwrap();

    let constraints = io::import_constraints_csv(&path).unwrap();
    let two = EmployeeId::new("2");
    let three = EmployeeId::new("3");
    assert_eq!(constraints.get(&two, 0), Some(Constraint::Off));
    assert_eq!(constraints.get(&two, 1), None);
    assert_eq!(constraints.get(&two, 2), Some(Constraint::Vacation));
    assert_eq!(constraints.get(&three, 1), Some(Constraint::Vacation));
    assert_eq!(constraints.get(&three, 2), None);

    fs::write(&path, "employee_id,1\n2,X\n").unwrap();
    let err = io::import_constraints_csv(&path).unwrap_err();
    assert!(err.to_string().contains("invalid constraint"));
}

#[test]
fn generated_schedule_survives_storage() {
    let dir = tempdir().unwrap();
    let employees_path = dir.path().join("employees.csv");
    fs::write(
        &employees_path,
        "id,department,does_not_work_on_saturdays\n1,Stacja,true\n2,Stacja,\n3,Stacja,\n",
    )
    .unwrap();
    let employees = io::import_employees(&employees_path).unwrap();

    let generated = generate_schedule(
        &employees,
        MonthRef::new(2024, 5).unwrap(),
        &ManualConstraints::new(),
        ShiftRequirements::default(),
    )
    .unwrap();

    let storage = JsonStorage::open(dir.path().join("schedule.json")).unwrap();
    storage.save(&generated).unwrap();
    let loaded = storage.load().unwrap();

    assert_eq!(loaded, generated);
    assert!(validate_coverage(&loaded.schedule, &loaded.demand()).is_ok());
}

#[test]
fn export_schedule_csv_has_one_column_per_day() {
    let dir = tempdir().unwrap();
    let employees = vec![
        grafik::Employee::new("a", ""),
        grafik::Employee::new("b", ""),
        grafik::Employee::new("c", ""),
    ];
    let generated = generate_schedule(
        &employees,
        MonthRef::new(2023, 1).unwrap(),
        &ManualConstraints::new(),
        ShiftRequirements::default(),
    )
    .unwrap();

    let path = dir.path().join("schedule.csv");
    io::export_schedule_csv(&path, &generated).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();

    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("employee_id,1,2,3,"));
    assert!(lines[0].ends_with(",28"));
    assert!(lines[1].starts_with("a,7-19,"));
    assert!(lines[3].starts_with("c,,"));
    assert_eq!(lines[1].split(',').count(), 29);
}

#[test]
fn storage_rejects_rows_that_do_not_match_the_month() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("schedule.json");
    fs::write(
        &path,
        r#"{
            "schedule": {"1": ["7-19", "19-7"], "2": ["19-7", "7-19"]},
            "daysInMonth": 28,
            "month": 1,
            "year": 2023,
            "dayShiftRequired": 1,
            "nightShiftRequired": 1
        }"#,
    )
    .unwrap();

    let err = JsonStorage::open(&path).unwrap().load().unwrap_err();
    assert!(err.to_string().contains("row 1 has 2 days, expected 28"), "{err}");
}
