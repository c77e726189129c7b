//! Document Conversion
//!
//! Schema boundary between JSON documents and typed entities. Missing
//! fields take their defaults here so consumers never see partial records.

use serde_json::{Map, Value};

use crate::domain::{DomainError, DomainResult, Unit, UnitId, UnitPatch};

/// Serialize a unit into a document body (the id is never part of it)
pub fn unit_to_document(unit: &Unit) -> DomainResult<Value> {
    serde_json::to_value(unit)
        .map_err(|e| DomainError::Write(format!("Failed to encode unit {}: {}", unit.unit_number, e)))
}

/// Read a document body into a unit carrying `id`
pub fn document_to_unit(id: &str, body: Value) -> DomainResult<Unit> {
    let unit: Unit = serde_json::from_value(body)
        .map_err(|e| DomainError::Fetch(format!("Malformed unit document {}: {}", id, e)))?;
    Ok(unit.with_id(UnitId::new(id)))
}

/// Encode the fields set in a patch as a JSON object
pub fn patch_to_fields(patch: &UnitPatch) -> DomainResult<Map<String, Value>> {
    match serde_json::to_value(patch) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(DomainError::Write(format!("Patch is not an object: {}", other))),
        Err(e) => Err(DomainError::Write(format!("Failed to encode patch: {}", e))),
    }
}

/// Replace top-level fields of `body` with those in `fields`
pub fn merge_top_level(body: &mut Value, fields: Map<String, Value>) -> DomainResult<()> {
    let Value::Object(target) = body else {
        return Err(DomainError::Write("Stored document is not an object".to_string()));
    };
    for (key, value) in fields {
        target.insert(key, value);
    }
    Ok(())
}
