use chrono::{DateTime, NaiveDate};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Marqueur historique de la règle « ne travaille pas le samedi ».
pub const SATURDAY_REST_TAG: &str = "Nie pracuje w soboty";

/// Aucun mois ne dépasse 31 jours.
pub const MAX_DAYS_IN_MONTH: usize = 31;

/// Identifiant fort pour Employee
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Les anciens enregistrements portent des identifiants numériques.
impl<'de> Deserialize<'de> for EmployeeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Number(n) => Self(n.to_string()),
        })
    }
}

/// Code d'une case du planning. Une case vide est représentée par `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftCode {
    #[serde(rename = "0")]
    Off,
    #[serde(rename = "U")]
    Vacation,
    #[serde(rename = "7-19")]
    Day,
    #[serde(rename = "19-7")]
    Night,
}

impl ShiftCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ShiftCode::Off => "0",
            ShiftCode::Vacation => "U",
            ShiftCode::Day => "7-19",
            ShiftCode::Night => "19-7",
        }
    }

    /// Vrai pour les gardes effectivement travaillées (`7-19`, `19-7`).
    pub fn is_working(self) -> bool {
        matches!(self, ShiftCode::Day | ShiftCode::Night)
    }
}

impl fmt::Display for ShiftCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type de garde à pourvoir ; l'ordre de `ALL` est l'ordre d'affectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftKind {
    #[serde(rename = "7-19")]
    Day,
    #[serde(rename = "19-7")]
    Night,
}

impl ShiftKind {
    pub const ALL: [ShiftKind; 2] = [ShiftKind::Day, ShiftKind::Night];

    pub fn code(self) -> ShiftCode {
        match self {
            ShiftKind::Day => ShiftCode::Day,
            ShiftKind::Night => ShiftCode::Night,
        }
    }
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code().as_str())
    }
}

/// Contrainte manuelle posée sur un jour : repos (`0`) ou congés (`U`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    Off,
    Vacation,
}

impl Constraint {
    /// `"0"` et `"U"` uniquement ; toute autre valeur équivaut à une case vide.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "0" => Some(Constraint::Off),
            "U" => Some(Constraint::Vacation),
            _ => None,
        }
    }

    pub fn code(self) -> ShiftCode {
        match self {
            Constraint::Off => ShiftCode::Off,
            Constraint::Vacation => ShiftCode::Vacation,
        }
    }
}

/// Salarié tel que vu par le générateur.
///
/// Les représentations historiques du drapeau « pas le samedi »
/// (`doesNotWorkOnSaturdays`, `noSaturdays`, tag dans `constraints`) sont
/// ramenées à `does_not_work_on_saturdays` à la désérialisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EmployeeRecord", rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub department: String,
    pub does_not_work_on_saturdays: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_date: Option<NaiveDate>,
}

impl Employee {
    pub fn new<I: AsRef<str>, D: Into<String>>(id: I, department: D) -> Self {
        Self {
            id: EmployeeId::new(id),
            department: department.into(),
            does_not_work_on_saturdays: false,
            termination_date: None,
        }
    }

    pub fn with_saturday_rest(mut self, flag: bool) -> Self {
        self.does_not_work_on_saturdays = flag;
        self
    }

    pub fn terminated(mut self, date: NaiveDate) -> Self {
        self.termination_date = Some(date);
        self
    }

    /// Un salarié avec une date de fin de contrat est exclu de la génération.
    pub fn is_active(&self) -> bool {
        self.termination_date.is_none()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmployeeRecord {
    id: EmployeeId,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    does_not_work_on_saturdays: Option<bool>,
    #[serde(default)]
    no_saturdays: Option<bool>,
    #[serde(default)]
    constraints: Option<Vec<String>>,
    #[serde(default)]
    termination_date: Option<String>,
}

impl TryFrom<EmployeeRecord> for Employee {
    type Error = String;

    fn try_from(rec: EmployeeRecord) -> Result<Self, Self::Error> {
        let tagged = rec
            .constraints
            .as_deref()
            .is_some_and(|tags| tags.iter().any(|t| t == SATURDAY_REST_TAG));
        let does_not_work_on_saturdays = tagged
            || rec.does_not_work_on_saturdays.unwrap_or(false)
            || rec.no_saturdays.unwrap_or(false);
        let termination_date = match rec.termination_date.as_deref() {
            Some(raw) => parse_termination_date(raw)?,
            None => None,
        };
        Ok(Self {
            id: rec.id,
            department: rec.department.unwrap_or_default(),
            does_not_work_on_saturdays,
            termination_date,
        })
    }
}

/// `YYYY-MM-DD` ou horodatage RFC3339 ; chaîne vide = pas de date.
pub fn parse_termination_date(raw: &str) -> Result<Option<NaiveDate>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| Some(dt.date_naive()))
        .map_err(|_| format!("invalid termination date: {raw}"))
}

/// Matrice des contraintes manuelles, par salarié puis par jour (index 0).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<EmployeeId, Vec<Option<String>>>",
    into = "BTreeMap<EmployeeId, Vec<String>>"
)]
pub struct ManualConstraints {
    entries: BTreeMap<EmployeeId, Vec<Option<Constraint>>>,
}

impl ManualConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pose une contrainte ; la ligne est allongée au besoin. Un jour hors de
    /// tout mois (index >= 31) est ignoré et la méthode renvoie `false`.
    pub fn set(&mut self, id: &EmployeeId, day: usize, constraint: Constraint) -> bool {
        if day >= MAX_DAYS_IN_MONTH {
            return false;
        }
        let row = self.entries.entry(id.clone()).or_default();
        if row.len() <= day {
            row.resize(day + 1, None);
        }
        row[day] = Some(constraint);
        true
    }

    /// Remplace la ligne d'un salarié à partir de valeurs brutes (`""`, `"0"`, `"U"`).
    pub fn insert_raw<S: AsRef<str>>(&mut self, id: EmployeeId, raw: &[S]) {
        let row = raw.iter().map(|v| Constraint::parse(v.as_ref())).collect();
        self.entries.insert(id, row);
    }

    /// Contrainte d'un salarié pour un jour ; au-delà de la ligne, rien.
    pub fn get(&self, id: &EmployeeId, day: usize) -> Option<Constraint> {
        self.entries.get(id).and_then(|row| row.get(day).copied().flatten())
    }
}

impl From<BTreeMap<EmployeeId, Vec<Option<String>>>> for ManualConstraints {
    fn from(raw: BTreeMap<EmployeeId, Vec<Option<String>>>) -> Self {
        let entries = raw
            .into_iter()
            .map(|(id, row)| {
                let row = row
                    .iter()
                    .map(|v| v.as_deref().and_then(Constraint::parse))
                    .collect();
                (id, row)
            })
            .collect();
        Self { entries }
    }
}

impl From<ManualConstraints> for BTreeMap<EmployeeId, Vec<String>> {
    fn from(constraints: ManualConstraints) -> Self {
        constraints
            .entries
            .into_iter()
            .map(|(id, row)| {
                let row = row
                    .into_iter()
                    .map(|c| c.map(|c| c.code().as_str().to_string()).unwrap_or_default())
                    .collect();
                (id, row)
            })
            .collect()
    }
}

/// Ligne du planning : un salarié, une case par jour du mois.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRow {
    pub employee: EmployeeId,
    pub days: Vec<Option<ShiftCode>>,
}

/// Planning d'un mois, lignes dans l'ordre fourni par l'appelant.
///
/// Sérialisé en objet JSON indexé par identifiant de salarié, l'ordre des
/// lignes étant conservé.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleTemplate {
    rows: Vec<ScheduleRow>,
}

impl ScheduleTemplate {
    pub fn from_rows(rows: Vec<ScheduleRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ScheduleRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, id: &EmployeeId) -> Option<&[Option<ShiftCode>]> {
        self.rows
            .iter()
            .find(|r| &r.employee == id)
            .map(|r| r.days.as_slice())
    }

    pub fn slot(&self, row: usize, day: usize) -> Option<ShiftCode> {
        self.rows
            .get(row)
            .and_then(|r| r.days.get(day).copied().flatten())
    }

    /// Remplit une case vide. Une case déjà posée n'est jamais réécrite.
    pub(crate) fn fill(&mut self, row: usize, day: usize, code: ShiftCode) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.days.get_mut(day)) {
            Some(slot) if slot.is_none() => {
                *slot = Some(code);
                true
            }
            _ => false,
        }
    }

    /// Nombre de gardes travaillées (`7-19` / `19-7`) d'une ligne.
    pub fn working_shifts_at(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, |r| {
            r.days
                .iter()
                .filter(|s| s.is_some_and(ShiftCode::is_working))
                .count()
        })
    }

    pub fn working_shifts(&self, id: &EmployeeId) -> usize {
        self.rows
            .iter()
            .position(|r| &r.employee == id)
            .map_or(0, |row| self.working_shifts_at(row))
    }

    /// Nombre de salariés portant `code` le jour `day` (index 0).
    pub fn count(&self, day: usize, code: ShiftCode) -> usize {
        self.rows
            .iter()
            .filter(|r| r.days.get(day).copied().flatten() == Some(code))
            .count()
    }
}

impl Serialize for ScheduleTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rows.len()))?;
        for row in &self.rows {
            map.serialize_entry(&row.employee, &row.days)?;
        }
        map.end()
    }
}

struct TemplateVisitor;

impl<'de> Visitor<'de> for TemplateVisitor {
    type Value = ScheduleTemplate;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of employee id to day slots")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut rows: Vec<ScheduleRow> = Vec::new();
        while let Some((employee, days)) =
            access.next_entry::<EmployeeId, Vec<Option<ShiftCode>>>()?
        {
            if rows.iter().any(|r| r.employee == employee) {
                return Err(de::Error::custom(format!(
                    "duplicate employee id: {employee}"
                )));
            }
            if let Some(first) = rows.first() {
                if first.days.len() != days.len() {
                    return Err(de::Error::custom(format!(
                        "row {employee} has {} days, expected {}",
                        days.len(),
                        first.days.len()
                    )));
                }
            }
            rows.push(ScheduleRow { employee, days });
        }
        Ok(ScheduleTemplate { rows })
    }
}

impl<'de> Deserialize<'de> for ScheduleTemplate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TemplateVisitor)
    }
}
