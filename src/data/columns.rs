use super::model::{Column, Table};

// ---------------------------------------------------------------------------
// Canonical column roles
// ---------------------------------------------------------------------------

pub const CAL_BP: &str = "cal_bp";
pub const C14_AGE: &str = "c14_age";
pub const DELTA14C: &str = "delta14c";
pub const SIGMA: &str = "sigma";
pub const SIGMA1: &str = "sigma1";

/// The canonical meaning a messy header can be classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    CalBp,
    C14Age,
    Delta14c,
    Sigma,
}

/// A header predicate paired with the role it assigns.
pub struct ColumnRule {
    pub role: Role,
    pub matches: fn(&str) -> bool,
}

/// Classification rules, tried in order; the first match wins.
pub const RULES: &[ColumnRule] = &[
    ColumnRule {
        role: Role::CalBp,
        matches: |c| c.contains("cal") && c.contains("bp"),
    },
    ColumnRule {
        role: Role::C14Age,
        matches: |c| {
            (c.contains("14c") || c.contains("c14") || c.starts_with("14")) && c.contains("age")
        },
    },
    ColumnRule {
        role: Role::Delta14c,
        matches: |c| c.contains("delta") && c.contains("14"),
    },
    ColumnRule {
        role: Role::Sigma,
        matches: |c| c.contains("sigma"),
    },
];

/// Canonical names handed out to successive sigma-like columns.
const SIGMA_NAMES: [&str; 2] = [SIGMA, SIGMA1];

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Collapse every run of non-alphanumeric characters to `_`, lowercase,
/// and trim underscores from both ends.
///
/// `"14C Age (BP)"` → `"14c_age_bp"`
pub fn clean_label(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_run = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out.trim_matches('_').to_string()
}

/// Role of an already-cleaned label, if any rule matches.
pub fn classify(cleaned: &str) -> Option<Role> {
    RULES.iter().find(|rule| (rule.matches)(cleaned)).map(|rule| rule.role)
}

/// Map each raw label to its output label, in column order.
///
/// Only the first two sigma-like columns are renamed; any further ones
/// keep their cleaned label.
pub fn normalize_labels<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut sigma_seen = 0usize;
    raw.iter()
        .map(|label| {
            let cleaned = clean_label(label.as_ref());
            let canonical = match classify(&cleaned) {
                Some(Role::CalBp) => Some(CAL_BP),
                Some(Role::C14Age) => Some(C14_AGE),
                Some(Role::Delta14c) => Some(DELTA14C),
                Some(Role::Sigma) => {
                    let name = SIGMA_NAMES.get(sigma_seen).copied();
                    sigma_seen += 1;
                    name
                }
                None => None,
            };
            canonical.map(str::to_string).unwrap_or(cleaned)
        })
        .collect()
}

/// Relabel a table with canonical column names.
///
/// When two columns end up with the same label the later one's values
/// replace the earlier one's.
pub fn normalize(table: Table) -> Table {
    let labels = normalize_labels(&table.column_names());
    let columns = table
        .into_columns()
        .into_iter()
        .zip(labels)
        .map(|(col, name)| Column {
            name,
            values: col.values,
        })
        .collect();
    Table::from_columns(columns)
}
