use crate::generator::GeneratedSchedule;
use crate::model::{parse_termination_date, Constraint, Employee, EmployeeId, ManualConstraints};
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import de salariés : CSV si l'extension est `.csv`, JSON sinon.
pub fn import_employees<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Employee>> {
    let is_csv = path
        .as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        import_employees_csv(path)
    } else {
        import_employees_json(path)
    }
}

/// Import JSON : tableau d'enregistrements, anciens drapeaux acceptés.
pub fn import_employees_json<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Employee>> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let employees: Vec<Employee> = serde_json::from_slice(&data)
        .with_context(|| format!("parsing employees {}", path.display()))?;
    Ok(employees)
}

/// Import CSV : header `id,department[,does_not_work_on_saturdays][,termination_date]`
pub fn import_employees_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Employee>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        if id.is_empty() {
            bail!("invalid employee row (empty id)");
        }
        let department = rec.get(1).unwrap_or("").trim();
        let mut employee = Employee::new(id, department);
        if let Some(flag) = rec.get(2) {
            let flag = flag.trim();
            if !flag.is_empty() {
                employee.does_not_work_on_saturdays =
                    parse_saturday_flag(flag).with_context(|| {
                        format!("invalid does_not_work_on_saturdays value {flag:?} for employee {id}")
                    })?;
            }
        }
        if let Some(raw) = rec.get(3) {
            employee.termination_date = parse_termination_date(raw).map_err(anyhow::Error::msg)?;
        }
        out.push(employee);
    }
    Ok(out)
}

/// Colonne « ne travaille pas le samedi » des exports du service : booléen
/// ou oui/non en polonais (`tak`/`nie`), `x` pour une case cochée.
fn parse_saturday_flag(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "tak" | "yes" | "x" => Some(true),
        "false" | "0" | "nie" | "no" => Some(false),
        _ => None,
    }
}

/// Import des contraintes manuelles : header `employee_id,1,2,...`, une
/// cellule par jour (`""`, `0` ou `U`).
pub fn import_constraints_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<ManualConstraints> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut constraints = ManualConstraints::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing employee_id")?.trim();
        if id.is_empty() {
            bail!("invalid constraints row (empty employee_id)");
        }
        let cells: Vec<&str> = rec.iter().skip(1).map(str::trim).collect();
        for (idx, cell) in cells.iter().enumerate() {
            if !cell.is_empty() && Constraint::parse(cell).is_none() {
                bail!(
                    "invalid constraint {cell:?} for employee {id} on day {}",
                    idx + 1
                );
            }
        }
        constraints.insert_raw(EmployeeId::new(id), &cells);
    }
    Ok(constraints)
}

/// Export CSV du planning : header `employee_id,1,...,N`, case vide si non affectée.
pub fn export_schedule_csv<P: AsRef<Path>>(
    path: P,
    generated: &GeneratedSchedule,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;

    let mut buf = itoa::Buffer::new();
    let mut header = Vec::with_capacity(generated.days_in_month + 1);
    header.push("employee_id".to_string());
    for day in 1..=generated.days_in_month {
        header.push(buf.format(day).to_string());
    }
    w.write_record(&header)?;

    for row in generated.schedule.rows() {
        let mut record = Vec::with_capacity(row.days.len() + 1);
        record.push(row.employee.as_str());
        record.extend(row.days.iter().map(|s| s.map_or("", |code| code.as_str())));
        w.write_record(&record)?;
    }
    w.flush()?;
    Ok(())
}
