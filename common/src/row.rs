use std::collections::BTreeMap;

/// One pre-parsed source row: header name to cell value. Upstream owns the
/// actual CSV/XLSX reading; the engine only ever sees these mappings.
///
/// Headers are matched case-insensitively against per-field alias lists,
/// first alias wins, so "Card Name", "card name" and "CARD NAME" all hit.
#[derive(Debug, Clone, Default)]
pub struct SourceRow {
    fields: BTreeMap<String, String>,
}

impl SourceRow {
    pub fn new(fields: impl IntoIterator<Item = (String, String)>) -> Self {
        let fields = fields
            .into_iter()
            .map(|(header, value)| (header.trim().to_lowercase(), value))
            .collect();

        Self { fields }
    }

    /// Resolve a logical field through its alias list. Earlier aliases win
    /// over later ones regardless of header order in the file.
    pub fn field(&self, aliases: &[&str]) -> Option<&str> {
        for alias in aliases {
            if let Some(value) = self.fields.get(&alias.trim().to_lowercase()) {
                return Some(value.as_str());
            }
        }

        None
    }

    /// Like `field`, but trims the cell and drops it entirely when empty.
    pub fn field_trimmed(&self, aliases: &[&str]) -> Option<&str> {
        self.field(aliases)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(header, value)| (header.as_str(), value.as_str()))
    }
}

impl FromIterator<(String, String)> for SourceRow {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self::new(iter)
    }
}
