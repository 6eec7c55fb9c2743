use crate::config::SeedSource;
use crate::model::{Grade, Notification, Role, User};
use crate::roster::{Roster, DATE_FORMAT};
use anyhow::Context;
use chrono::Local;
use serde::Deserialize;
use std::path::Path;

const BUILTIN_SEED: &str = include_str!("../fixtures/seed.json");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedUser {
    username: String,
    password: String,
    full_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedGrade {
    id: i64,
    student_id: String,
    subject: String,
    value: f64,
    #[serde(default)]
    date: Option<String>,
    teacher_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedFile {
    #[serde(default)]
    admins: Vec<SeedUser>,
    #[serde(default)]
    teachers: Vec<SeedUser>,
    #[serde(default)]
    students: Vec<SeedUser>,
    #[serde(default)]
    grades: Vec<SeedGrade>,
    #[serde(default)]
    notifications: Vec<Notification>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub grades: usize,
    pub notifications: usize,
}

pub fn load(source: &SeedSource, roster: &mut Roster) -> anyhow::Result<SeedSummary> {
    let today = Local::now().format(DATE_FORMAT).to_string();
    match source {
        SeedSource::Empty => Ok(SeedSummary {
            users: 0,
            grades: 0,
            notifications: 0,
        }),
        SeedSource::Builtin => {
            apply_json(BUILTIN_SEED, roster, &today).context("built-in seed fixture is invalid")
        }
        SeedSource::File(path) => load_file(path, roster, &today),
    }
}

fn load_file(path: &Path, roster: &mut Roster, today: &str) -> anyhow::Result<SeedSummary> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {}", path.to_string_lossy()))?;
    apply_json(&text, roster, today)
        .with_context(|| format!("failed to load seed file {}", path.to_string_lossy()))
}

/// Bulk-inserts a seed document. Grade values are taken as written, with no
/// range check; a missing grade date becomes `today`.
pub fn apply_json(text: &str, roster: &mut Roster, today: &str) -> anyhow::Result<SeedSummary> {
    let seed: SeedFile = serde_json::from_str(text).context("malformed seed json")?;

    let mut users = 0;
    for (role, list) in [
        (Role::Admin, seed.admins),
        (Role::Teacher, seed.teachers),
        (Role::Student, seed.students),
    ] {
        for u in list {
            roster.insert_user(User::new(role, u.username, u.password, u.full_name))?;
            users += 1;
        }
    }

    let grades = seed.grades.len();
    for g in seed.grades {
        roster.insert_grade(Grade {
            id: g.id,
            student_id: g.student_id,
            subject: g.subject,
            value: g.value,
            date: g.date.unwrap_or_else(|| today.to_string()),
            teacher_id: g.teacher_id,
        });
    }

    let notifications = seed.notifications.len();
    for n in seed.notifications {
        roster.insert_notification(n);
    }

    Ok(SeedSummary {
        users,
        grades,
        notifications,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_fixture_matches_the_stock_roster() {
        let mut r = Roster::new();
        let summary = load(&SeedSource::Builtin, &mut r).expect("seed");
        assert_eq!(
            summary,
            SeedSummary {
                users: 5,
                grades: 3,
                notifications: 0
            }
        );

        assert!(r.authenticate(Role::Admin, "admin", "admin123").is_ok());
        assert!(r.authenticate(Role::Teacher, "teacher2", "pass123").is_ok());
        assert!(r.authenticate(Role::Student, "student2", "pass123").is_ok());

        let t1: Vec<(i64, &str)> = r
            .grades_for_teacher("teacher1")
            .map(|g| (g.id, g.subject.as_str()))
            .collect();
        assert_eq!(t1, vec![(1, "Mathematics"), (2, "Science")]);
        // Stamped with the load date, MM/DD/YYYY.
        assert!(r.grades().iter().all(|g| g.date.len() == 10));
    }

    #[test]
    fn undated_grades_take_the_given_day() {
        let mut r = Roster::new();
        let text = r#"{
            "grades": [
                { "id": 1, "studentId": "s", "subject": "Art", "value": 50, "teacherId": "t" }
            ]
        }"#;
        apply_json(text, &mut r, "09/09/2024").expect("apply");
        assert_eq!(r.grades()[0].date, "09/09/2024");
    }

    #[test]
    fn empty_source_leaves_roster_untouched() {
        let mut r = Roster::new();
        load(&SeedSource::Empty, &mut r).expect("seed");
        assert_eq!(r.stats().grades, 0);
        assert!(r.users(Role::Admin).is_empty());
    }

    #[test]
    fn seed_values_skip_range_validation() {
        let mut r = Roster::new();
        let text = r#"{
            "students": [{ "username": "s", "password": "p", "fullName": "S" }],
            "grades": [
                { "id": 7, "studentId": "s", "subject": "Extra", "value": 140, "date": "01/02/2023", "teacherId": "t" }
            ],
            "notifications": [
                { "userId": "s", "message": "Welcome", "date": "01/02/2023" }
            ]
        }"#;
        let summary = apply_json(text, &mut r, "09/09/2024").expect("apply");
        assert_eq!(summary.notifications, 1);
        assert_eq!(r.grades()[0].value, 140.0);
        assert_eq!(r.grades()[0].date, "01/02/2023");
        assert_eq!(r.notifications_for("s").count(), 1);
    }

    #[test]
    fn duplicate_seed_users_are_rejected() {
        let mut r = Roster::new();
        let text = r#"{
            "teachers": [
                { "username": "t", "password": "p", "fullName": "T" },
                { "username": "t", "password": "q", "fullName": "T2" }
            ]
        }"#;
        let err = apply_json(text, &mut r, "09/09/2024").unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn missing_seed_file_reports_the_path() {
        let mut r = Roster::new();
        let path = std::env::temp_dir().join("gradebookd-no-such-seed.json");
        let err = load(&SeedSource::File(path), &mut r).unwrap_err();
        assert!(format!("{err:#}").contains("gradebookd-no-such-seed.json"));
    }
}
