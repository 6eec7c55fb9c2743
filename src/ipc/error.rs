use crate::roster::RosterError;
use serde_json::json;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

pub fn roster_err(id: &str, e: &RosterError) -> serde_json::Value {
    let details = match e {
        RosterError::DuplicateUsername { role, username } => {
            Some(json!({ "role": role, "username": username }))
        }
        RosterError::MissingField(field) => Some(json!({ "field": field })),
        RosterError::InvalidRange { raw, .. } => Some(json!({ "input": raw })),
        RosterError::RoleNotRegistrable(role) => Some(json!({ "role": role })),
        RosterError::GradeIdsExhausted { last_id } => Some(json!({ "lastId": last_id })),
        RosterError::InvalidCredentials => None,
    };
    err(id, e.code(), e.to_string(), details)
}
