use crate::ipc::error::{err, ok, roster_err};
use crate::ipc::helpers::{forbidden, require_login, require_role, str_param};
use crate::ipc::types::{AppState, Request};
use crate::model::{Grade, Role};
use serde_json::json;

/// Students may only look at themselves; everyone else names a student.
fn student_target(state: &AppState, req: &Request) -> Result<String, serde_json::Value> {
    let caller = require_login(state, req)?;
    let requested = str_param(req, "studentId");
    match caller.role {
        Role::Student => match requested {
            Some(id) if id != caller.username => Err(forbidden(req, caller.role)),
            _ => Ok(caller.username),
        },
        Role::Teacher | Role::Admin => match requested {
            Some(id) => Ok(id.to_string()),
            None => Err(err(&req.id, "bad_params", "missing studentId", None)),
        },
    }
}

fn handle_grades_for_student(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student_id = match student_target(state, req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let grades: Vec<&Grade> = state.roster.grades_for_student(&student_id).collect();
    ok(
        &req.id,
        json!({ "studentId": student_id, "grades": grades }),
    )
}

fn handle_grades_for_teacher(state: &mut AppState, req: &Request) -> serde_json::Value {
    let caller = match require_role(state, req, &[Role::Teacher, Role::Admin]) {
        Ok(u) => u,
        Err(resp) => return resp,
    };
    let requested = str_param(req, "teacherId");
    let teacher_id = match caller.role {
        Role::Teacher => match requested {
            Some(id) if id != caller.username => return forbidden(req, caller.role),
            _ => caller.username,
        },
        _ => match requested {
            Some(id) => id.to_string(),
            None => return err(&req.id, "bad_params", "missing teacherId", None),
        },
    };
    let grades: Vec<&Grade> = state.roster.grades_for_teacher(&teacher_id).collect();
    ok(
        &req.id,
        json!({ "teacherId": teacher_id, "grades": grades }),
    )
}

fn handle_grades_add(state: &mut AppState, req: &Request) -> serde_json::Value {
    let teacher = match require_role(state, req, &[Role::Teacher]) {
        Ok(u) => u,
        Err(resp) => return resp,
    };
    let student_id = str_param(req, "studentId").unwrap_or("");
    let subject = str_param(req, "subject").unwrap_or("");
    // Forms send text; scripted callers may send a bare number.
    let raw = match req.params.get("grade") {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(_) => {
            return err(
                &req.id,
                "bad_params",
                "grade must be a string or a number",
                None,
            )
        }
    };

    match state
        .roster
        .add_grade(student_id, subject, &raw, &teacher.username)
    {
        Ok(grade) => {
            tracing::info!(
                grade_id = grade.id,
                student_id = %grade.student_id,
                teacher_id = %grade.teacher_id,
                "grade added"
            );
            ok(&req.id, json!({ "grade": grade }))
        }
        Err(e) => roster_err(&req.id, &e),
    }
}

fn handle_status_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student_id = match student_target(state, req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let status = state.roster.compute_status(&student_id);
    ok(
        &req.id,
        json!({
            "studentId": student_id,
            "totalSubjects": status.total_subjects,
            "failedSubjects": status.failed_subjects,
            "status": status.status,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grades.forStudent" => Some(handle_grades_for_student(state, req)),
        "grades.forTeacher" => Some(handle_grades_for_teacher(state, req)),
        "grades.add" => Some(handle_grades_add(state, req)),
        "status.get" => Some(handle_status_get(state, req)),
        _ => None,
    }
}
