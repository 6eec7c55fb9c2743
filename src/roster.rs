use crate::calc::{self, GradeInputError, RosterStats, StudentStatus};
use crate::model::{Grade, Notification, Role, User};
use chrono::{DateTime, Local};
use thiserror::Error;

pub const DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RosterError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("username {username:?} already exists among {role} users")]
    DuplicateUsername { role: Role, username: String },
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{}", invalid_range_message(.parsed))]
    InvalidRange { raw: String, parsed: Option<f64> },
    #[error("{0} accounts cannot be self-registered")]
    RoleNotRegistrable(Role),
    #[error("no grade id left after {last_id}")]
    GradeIdsExhausted { last_id: i64 },
}

fn invalid_range_message(parsed: &Option<f64>) -> &'static str {
    match parsed {
        Some(_) => "grade must be between 0 and 100",
        None => "grade must be a valid number",
    }
}

impl RosterError {
    /// Stable code surfaced to front ends.
    pub fn code(&self) -> &'static str {
        match self {
            RosterError::InvalidCredentials => "invalid_credentials",
            RosterError::DuplicateUsername { .. } => "duplicate_username",
            RosterError::MissingField(_) => "missing_field",
            RosterError::InvalidRange { .. } => "invalid_range",
            RosterError::RoleNotRegistrable(_) => "role_not_registrable",
            RosterError::GradeIdsExhausted { .. } => "grade_ids_exhausted",
        }
    }
}

/// Everything the program knows, held for the life of the process.
#[derive(Debug, Default)]
pub struct Roster {
    students: Vec<User>,
    teachers: Vec<User>,
    admins: Vec<User>,
    grades: Vec<Grade>,
    notifications: Vec<Notification>,
    last_grade_id: i64,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    fn list(&self, role: Role) -> &Vec<User> {
        match role {
            Role::Student => &self.students,
            Role::Teacher => &self.teachers,
            Role::Admin => &self.admins,
        }
    }

    fn list_mut(&mut self, role: Role) -> &mut Vec<User> {
        match role {
            Role::Student => &mut self.students,
            Role::Teacher => &mut self.teachers,
            Role::Admin => &mut self.admins,
        }
    }

    pub fn users(&self, role: Role) -> &[User] {
        self.list(role)
    }

    pub fn find_user(&self, role: Role, username: &str) -> Option<&User> {
        self.list(role).iter().find(|u| u.username == username)
    }

    pub fn authenticate(
        &self,
        role: Role,
        username: &str,
        password: &str,
    ) -> Result<&User, RosterError> {
        self.list(role)
            .iter()
            .find(|u| u.username == username && u.password == password)
            .ok_or(RosterError::InvalidCredentials)
    }

    pub fn register(
        &mut self,
        role: Role,
        username: &str,
        password: &str,
        full_name: &str,
    ) -> Result<&User, RosterError> {
        if !role.can_self_register() {
            return Err(RosterError::RoleNotRegistrable(role));
        }
        if username.is_empty() {
            return Err(RosterError::MissingField("username"));
        }
        if password.is_empty() {
            return Err(RosterError::MissingField("password"));
        }
        if full_name.is_empty() {
            return Err(RosterError::MissingField("fullName"));
        }
        self.insert_user(User::new(role, username, password, full_name))
    }

    /// Appends a user, still refusing a username already taken within the role.
    pub fn insert_user(&mut self, user: User) -> Result<&User, RosterError> {
        let role = user.role;
        if self.find_user(role, &user.username).is_some() {
            return Err(RosterError::DuplicateUsername {
                role,
                username: user.username,
            });
        }
        let list = self.list_mut(role);
        list.push(user);
        Ok(&list[list.len() - 1])
    }

    /// Removes the user if present. Grades that reference them stay behind.
    pub fn delete_user(&mut self, role: Role, username: &str) -> bool {
        let list = self.list_mut(role);
        match list.iter().position(|u| u.username == username) {
            Some(idx) => {
                list.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn grades(&self) -> &[Grade] {
        &self.grades
    }

    pub fn grades_for_student<'a>(
        &'a self,
        student_id: &'a str,
    ) -> impl Iterator<Item = &'a Grade> + 'a {
        self.grades.iter().filter(move |g| g.student_id == student_id)
    }

    pub fn grades_for_teacher<'a>(
        &'a self,
        teacher_id: &'a str,
    ) -> impl Iterator<Item = &'a Grade> + 'a {
        self.grades.iter().filter(move |g| g.teacher_id == teacher_id)
    }

    pub fn add_grade(
        &mut self,
        student_id: &str,
        subject: &str,
        raw_value: &str,
        teacher_id: &str,
    ) -> Result<&Grade, RosterError> {
        self.add_grade_at(student_id, subject, raw_value, teacher_id, Local::now())
    }

    pub fn add_grade_at(
        &mut self,
        student_id: &str,
        subject: &str,
        raw_value: &str,
        teacher_id: &str,
        now: DateTime<Local>,
    ) -> Result<&Grade, RosterError> {
        if student_id.is_empty() {
            return Err(RosterError::MissingField("studentId"));
        }
        if subject.is_empty() {
            return Err(RosterError::MissingField("subject"));
        }
        if raw_value.is_empty() {
            return Err(RosterError::MissingField("grade"));
        }
        let value = calc::parse_grade_value(raw_value).map_err(|e| RosterError::InvalidRange {
            raw: raw_value.to_string(),
            parsed: match e {
                GradeInputError::NotANumber => None,
                GradeInputError::OutOfRange(v) => Some(v),
            },
        })?;

        let id = self.next_grade_id(now.timestamp_millis())?;
        self.insert_grade(Grade {
            id,
            student_id: student_id.to_string(),
            subject: subject.to_string(),
            value,
            date: now.format(DATE_FORMAT).to_string(),
            teacher_id: teacher_id.to_string(),
        });
        Ok(&self.grades[self.grades.len() - 1])
    }

    // Millisecond clock, nudged forward when two grades land in the same tick.
    fn next_grade_id(&self, now_millis: i64) -> Result<i64, RosterError> {
        let after_last = self
            .last_grade_id
            .checked_add(1)
            .ok_or(RosterError::GradeIdsExhausted {
                last_id: self.last_grade_id,
            })?;
        Ok(now_millis.max(after_last))
    }

    /// Appends a grade as-is; no range check.
    pub fn insert_grade(&mut self, grade: Grade) {
        self.last_grade_id = self.last_grade_id.max(grade.id);
        self.grades.push(grade);
    }

    pub fn compute_status(&self, student_id: &str) -> StudentStatus {
        calc::student_status(self.grades_for_student(student_id))
    }

    pub fn stats(&self) -> RosterStats {
        RosterStats {
            students: self.students.len(),
            teachers: self.teachers.len(),
            admins: self.admins.len(),
            grades: self.grades().len(),
        }
    }

    pub fn insert_notification(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn notifications_for<'a>(
        &'a self,
        user_id: &'a str,
    ) -> impl Iterator<Item = &'a Notification> + 'a {
        self.notifications
            .iter()
            .filter(move |n| n.user_id == user_id)
    }
}
