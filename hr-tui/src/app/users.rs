use hr_client::domain::{Role, User, UserId};
use hr_client::{NewUser, UserFilter, UserListing};

use super::*;

/// Fields of the create-user form, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    FirstName,
    LastName,
    Email,
    Role,
    Department,
    Position,
    HireDate,
    Submit,
}

impl UserField {
    const ORDER: [UserField; 8] = [
        UserField::FirstName,
        UserField::LastName,
        UserField::Email,
        UserField::Role,
        UserField::Department,
        UserField::Position,
        UserField::HireDate,
        UserField::Submit,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            UserField::FirstName => "First name",
            UserField::LastName => "Last name",
            UserField::Email => "Email",
            UserField::Role => "Role",
            UserField::Department => "Department",
            UserField::Position => "Position",
            UserField::HireDate => "Hire date",
            UserField::Submit => "Create",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserForm {
    pub focused: UserField,
    pub first_name: TextInput,
    pub last_name: TextInput,
    pub email: TextInput,
    pub role: Role,
    pub department: TextInput,
    pub position: TextInput,
    pub hire_date: TextInput,
    pub error: Option<String>,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            focused: UserField::FirstName,
            first_name: TextInput::new(),
            last_name: TextInput::new(),
            email: TextInput::new(),
            role: Role::Employee,
            department: TextInput::new(),
            position: TextInput::new(),
            hire_date: TextInput::new(),
            error: None,
        }
    }
}

impl UserForm {
    pub fn input_mut(&mut self, field: UserField) -> Option<&mut TextInput> {
        match field {
            UserField::FirstName => Some(&mut self.first_name),
            UserField::LastName => Some(&mut self.last_name),
            UserField::Email => Some(&mut self.email),
            UserField::Department => Some(&mut self.department),
            UserField::Position => Some(&mut self.position),
            UserField::HireDate => Some(&mut self.hire_date),
            UserField::Role | UserField::Submit => None,
        }
    }

    /// Step the role through what `actor` may hand out.
    pub fn cycle_role(&mut self, actor: &Role, forward: bool) {
        let roles = actor.assignable_roles();
        if roles.is_empty() {
            return;
        }
        let current = roles.iter().position(|r| *r == self.role);
        let next = match (current, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % roles.len(),
            (Some(i), false) => (i + roles.len() - 1) % roles.len(),
        };
        self.role = roles[next].clone();
    }

    /// The request body, or the first thing wrong with the form.
    pub fn to_new_user(&self, actor: &Role) -> Result<NewUser, String> {
        let optional = |input: &TextInput| {
            let value = input.value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };
        let hire_date = NewUser::parse_hire_date(&self.hire_date.value).map_err(|i| i.message())?;
        let user = NewUser {
            email: self.email.value.trim().to_string(),
            first_name: self.first_name.value.trim().to_string(),
            last_name: self.last_name.value.trim().to_string(),
            role: self.role.clone(),
            department: optional(&self.department),
            position: optional(&self.position),
            hire_date,
            manager_id: None,
        };
        match user.issues(actor).first() {
            Some(issue) => Err(issue.message()),
            None => Ok(user),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmKind {
    ResetPassword,
    Delete,
}

/// "Are you sure?" for a destructive call on one user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserConfirm {
    pub kind: ConfirmKind,
    pub user_id: UserId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UsersState {
    pub users: Vec<User>,
    pub departments: Vec<String>,
    pub selected: usize,
    pub loaded: bool,
    pub filter: UserFilter,
    pub search: TextInput,
    pub searching: bool,
    pub form: Option<UserForm>,
    pub confirm: Option<UserConfirm>,
    /// A create, reset or delete is on its way.
    pub saving: bool,
}

impl UsersState {
    /// Search box, form or confirmation is taking the keyboard.
    pub fn captures_keys(&self) -> bool {
        self.searching || self.form.is_some() || self.confirm.is_some()
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.users.get(self.selected)
    }
}

const ROLE_FILTERS: [Option<Role>; 4] = [
    None,
    Some(Role::Employee),
    Some(Role::HrExecutive),
    Some(Role::HrManager),
];

impl App {
    pub fn apply_user_listing(&mut self, listing: UserListing) {
        self.users.users = listing.users;
        if !listing.departments.is_empty() {
            self.users.departments = listing.departments;
        }
        self.users.loaded = true;
        self.users.selected = clamp_index(self.users.selected, self.users.users.len());
    }

    pub fn cycle_role_filter(&mut self) {
        let current = ROLE_FILTERS
            .iter()
            .position(|r| *r == self.users.filter.role)
            .unwrap_or(0);
        self.users.filter.role = ROLE_FILTERS[(current + 1) % ROLE_FILTERS.len()].clone();
    }

    /// Any department, then each known one in turn.
    pub fn cycle_department_filter(&mut self) {
        let departments = &self.users.departments;
        let next = match &self.users.filter.department {
            None => departments.first().cloned(),
            Some(current) => departments
                .iter()
                .position(|d| d == current)
                .and_then(|i| departments.get(i + 1))
                .cloned(),
        };
        self.users.filter.department = next;
    }

    pub fn open_user_form(&mut self) {
        self.users.form = Some(UserForm::default());
    }

    /// Deleting is for HR managers only; anyone else gets an error
    /// instead of a prompt.
    pub fn confirm_user_action(&mut self, kind: ConfirmKind) {
        if kind == ConfirmKind::Delete && self.session.user().role != Role::HrManager {
            self.set_error("Only HR managers can delete users");
            return;
        }
        let Some(user) = self.users.selected_user() else {
            return;
        };
        if kind == ConfirmKind::Delete && user.id == self.session.user().id {
            self.set_error("You cannot delete your own account");
            return;
        }
        self.users.confirm = Some(UserConfirm {
            kind,
            user_id: user.id,
            name: user.full_name(),
        });
    }

    pub fn can_delete_users(&self) -> bool {
        self.session.user().role == Role::HrManager
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{hr_app, user};
    use super::*;

    fn type_into(input: &mut TextInput, text: &str) {
        for c in text.chars() {
            input.insert(c);
        }
    }

    #[test]
    fn form_reports_first_problem() {
        let mut form = UserForm::default();
        assert_eq!(
            form.to_new_user(&Role::HrManager).unwrap_err(),
            "First name is required"
        );

        type_into(&mut form.first_name, "Sam");
        type_into(&mut form.last_name, "Rivera");
        type_into(&mut form.email, "sam@example.com");
        type_into(&mut form.hire_date, "June 3rd");
        assert_eq!(
            form.to_new_user(&Role::HrManager).unwrap_err(),
            "Hire date must be YYYY-MM-DD"
        );

        form.hire_date = TextInput::new();
        let user = form.to_new_user(&Role::HrManager).unwrap();
        assert_eq!(user.role, Role::Employee);
        assert_eq!(user.department, None);
    }

    #[test]
    fn executives_cannot_pick_manager_role() {
        let mut form = UserForm::default();
        for _ in 0..5 {
            form.cycle_role(&Role::HrExecutive, true);
            assert_ne!(form.role, Role::HrManager);
        }
        form.cycle_role(&Role::HrManager, false);
        form.cycle_role(&Role::HrManager, false);
        assert!(Role::HrManager.can_assign(&form.role));
    }

    #[test]
    fn department_filter_wraps_back_to_any() {
        let mut app = hr_app();
        app.users.departments = vec!["Finance".into(), "Operations".into()];
        app.cycle_department_filter();
        assert_eq!(app.users.filter.department.as_deref(), Some("Finance"));
        app.cycle_department_filter();
        assert_eq!(app.users.filter.department.as_deref(), Some("Operations"));
        app.cycle_department_filter();
        assert_eq!(app.users.filter.department, None);
    }

    #[test]
    fn executives_get_no_delete_prompt() {
        let mut app = App::new(
            Session::new("t", user(4, Role::HrExecutive)),
            time::macros::date!(2024 - 06 - 10),
        );
        app.users.users = vec![user(9, Role::Employee)];
        app.confirm_user_action(ConfirmKind::Delete);
        assert!(app.users.confirm.is_none());
        assert!(app.status_message.as_ref().is_some_and(|s| s.is_error));

        app.confirm_user_action(ConfirmKind::ResetPassword);
        assert_eq!(app.users.confirm.as_ref().map(|c| c.user_id), Some(9));
    }
}
