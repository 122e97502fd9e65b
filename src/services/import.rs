//! JSON import service
//!
//! Reads a JSON array of expense-shaped objects (the export format) and
//! writes every acceptable record for the signed-in owner in one batch.
//! Elements without an amount, date or category are skipped.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Expense, ExpenseId, ExpenseValidationError, NewExpense, UserId};
use crate::storage::Storage;

/// An element of the input that was not imported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Zero-based position in the input array
    pub index: usize,
    pub reason: String,
}

/// Outcome of an import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: Vec<SkippedRecord>,
    /// Set when the records were saved but the audit entry could not be
    /// written. The import itself still succeeded.
    pub audit_error: Option<String>,
}

impl ImportResult {
    /// Message shown after a successful import
    pub fn message(&self) -> String {
        format!("Successfully imported {} expenses.", self.imported)
    }
}

/// Service for bulk-importing expenses
pub struct ImportService<'a> {
    storage: &'a Storage,
    owner: UserId,
}

/// A field counts as missing when it is absent or holds a falsy value
fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(_) => false,
    }
}

fn field_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage, owner: UserId) -> Self {
        Self { storage, owner }
    }

    /// Parse `text` and import every valid element in a single write
    pub fn import_json(&self, text: &str) -> ExpenseResult<ImportResult> {
        if text.trim().is_empty() {
            return Err(ExpenseError::Validation(
                "Please paste valid JSON data.".into(),
            ));
        }

        let value: Value = serde_json::from_str(text)?;
        let elements = match value {
            Value::Array(elements) => elements,
            _ => {
                return Err(ExpenseError::Validation(
                    "Invalid data format. Expected an array of expenses.".into(),
                ))
            }
        };

        let mut result = ImportResult::default();
        let mut batch = Vec::new();
        let mut used_ids = HashSet::new();

        for (index, element) in elements.iter().enumerate() {
            match self.build_expense(element, &used_ids) {
                Ok(expense) => {
                    used_ids.insert(expense.id);
                    batch.push(expense);
                }
                Err(reason) => result.skipped.push(SkippedRecord { index, reason }),
            }
        }

        if !batch.is_empty() {
            result.imported = self.storage.expenses.commit_batch(batch)?;
        }

        // The batch is already on disk; reporting an error now would invite a
        // retry that imports everything twice
        if let Err(e) = self
            .storage
            .log_import(self.owner, result.imported, result.skipped.len())
        {
            result.audit_error = Some(e.user_message());
        }

        Ok(result)
    }

    fn build_expense(
        &self,
        element: &Value,
        used_ids: &HashSet<ExpenseId>,
    ) -> Result<Expense, String> {
        let fields = match element {
            Value::Object(fields) => fields,
            _ => return Err("not an object".to_string()),
        };

        for name in ["amount", "date", "category"] {
            if is_missing(fields.get(name)) {
                let label = match name {
                    "amount" => "Amount",
                    "date" => "Date",
                    _ => "Category",
                };
                return Err(ExpenseValidationError::Missing(label).to_string());
            }
        }

        let input = NewExpense::from_raw(
            &field_text(fields.get("amount")),
            &field_text(fields.get("date")),
            &field_text(fields.get("category")),
        )
        .map_err(|e| e.to_string())?;

        match self.reusable_id(fields, used_ids) {
            Some(existing) => {
                let mut expense = existing;
                expense.apply(input);
                Ok(expense)
            }
            None => {
                let id = self
                    .requested_id(fields)
                    .filter(|id| !used_ids.contains(id) && self.id_is_free(*id))
                    .unwrap_or_default();
                Ok(Expense::with_id(id, self.owner, input))
            }
        }
    }

    fn requested_id(&self, fields: &Map<String, Value>) -> Option<ExpenseId> {
        fields
            .get("id")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }

    /// An existing record of this owner that the element's id points at
    fn reusable_id(
        &self,
        fields: &Map<String, Value>,
        used_ids: &HashSet<ExpenseId>,
    ) -> Option<Expense> {
        let id = self.requested_id(fields)?;
        if used_ids.contains(&id) {
            return None;
        }
        self.storage
            .expenses
            .get(id)
            .ok()
            .flatten()
            .filter(|e| e.is_owned_by(self.owner))
    }

    fn id_is_free(&self, id: ExpenseId) -> bool {
        matches!(self.storage.expenses.get(id), Ok(None))
    }
}
