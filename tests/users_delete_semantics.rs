use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_gradebookd");
    let mut child = Command::new(exe)
        .env_remove("GRADEBOOKD_SEED")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn gradebookd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn error_code(value: &serde_json::Value) -> &str {
    assert_eq!(value.get("ok").and_then(|v| v.as_bool()), Some(false));
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
        .unwrap_or("")
}

fn usernames(result: &serde_json::Value) -> Vec<String> {
    result["users"]
        .as_array()
        .expect("users")
        .iter()
        .filter_map(|u| u["username"].as_str().map(str::to_string))
        .collect()
}

#[test]
fn delete_user_keeps_orphaned_grades() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "auth.login",
        json!({ "role": "admin", "username": "admin", "password": "admin123" }),
    );

    let students = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "users.list",
        json!({ "role": "student" }),
    );
    assert_eq!(usernames(&students), vec!["student1", "student2"]);
    assert_eq!(students["users"][0]["fullName"], "Alice Johnson");
    assert!(students["users"][0].get("password").is_none());

    let removed = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "users.delete",
        json!({ "role": "student", "username": "student1" }),
    );
    assert_eq!(removed["removed"], true);

    let students = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "users.list",
        json!({ "role": "student" }),
    );
    assert_eq!(usernames(&students), vec!["student2"]);

    // Grades are not cascaded away with the user.
    let orphaned = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "grades.forStudent",
        json!({ "studentId": "student1" }),
    );
    assert_eq!(orphaned["grades"].as_array().map(|a| a.len()), Some(2));

    let again = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "users.delete",
        json!({ "role": "student", "username": "student1" }),
    );
    assert_eq!(again["removed"], false);

    let stats = request_ok(&mut stdin, &mut reader, "7", "stats.get", json!({}));
    assert_eq!(stats["students"], 1);
    assert_eq!(stats["teachers"], 2);
    assert_eq!(stats["admins"], 1);
    assert_eq!(stats["grades"], 3);

    let _ = request_ok(&mut stdin, &mut reader, "8", "auth.logout", json!({}));
    let gone = request(
        &mut stdin,
        &mut reader,
        "9",
        "auth.login",
        json!({ "role": "student", "username": "student1", "password": "pass123" }),
    );
    assert_eq!(error_code(&gone), "invalid_credentials");

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn only_admins_delete_and_teachers_list_students_only() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "auth.login",
        json!({ "role": "teacher", "username": "teacher1", "password": "pass123" }),
    );

    let picker = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "users.list",
        json!({ "role": "student" }),
    );
    assert_eq!(usernames(&picker), vec!["student1", "student2"]);

    let teachers = request(
        &mut stdin,
        &mut reader,
        "3",
        "users.list",
        json!({ "role": "teacher" }),
    );
    assert_eq!(error_code(&teachers), "forbidden");

    let delete = request(
        &mut stdin,
        &mut reader,
        "4",
        "users.delete",
        json!({ "role": "student", "username": "student2" }),
    );
    assert_eq!(error_code(&delete), "forbidden");

    let stats = request_ok(&mut stdin, &mut reader, "5", "stats.get", json!({}));
    assert_eq!(stats["students"], 2);

    let _ = request_ok(&mut stdin, &mut reader, "6", "auth.logout", json!({}));
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "auth.login",
        json!({ "role": "student", "username": "student2", "password": "pass123" }),
    );
    let stats = request(&mut stdin, &mut reader, "8", "stats.get", json!({}));
    assert_eq!(error_code(&stats), "forbidden");

    drop(stdin);
    let _ = child.wait();
}
