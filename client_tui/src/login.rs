use accounts::UserStore;

pub const MAX_FIELD_LEN: usize = 24;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

/// Login screen state
#[derive(Debug, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
    pub message: Option<String>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn switch_field(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn push(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        let field = self.field_mut();
        if field.chars().count() < MAX_FIELD_LEN {
            field.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.field_mut().pop();
    }

    pub fn masked_password(&self) -> String {
        "*".repeat(self.password.chars().count())
    }

    /// Empty the fields, keeping any message
    pub fn clear(&mut self) {
        self.username.clear();
        self.password.clear();
        self.focus = LoginField::Username;
    }

    fn credentials(&mut self) -> Option<(String, String)> {
        let username = self.username.trim().to_string();
        if username.is_empty() || self.password.is_empty() {
            self.message = Some("Enter a username and password".to_string());
            return None;
        }
        Some((username, self.password.clone()))
    }

    /// Try to log in; returns the username on success
    pub fn log_in(&mut self, store: &mut UserStore) -> Option<String> {
        let (username, password) = self.credentials()?;
        match store.authenticate(&username, &password) {
            Ok(true) => {
                log::info!("{} logged in", username);
                self.clear();
                self.message = None;
                Some(username)
            }
            Ok(false) => {
                self.message = Some("Invalid username or password".to_string());
                self.password.clear();
                None
            }
            Err(e) => {
                log::warn!("Login failed for {}: {}", username, e);
                self.message = Some(e.to_string());
                None
            }
        }
    }

    /// Create an account and log straight in; returns the username on success
    pub fn register(&mut self, store: &mut UserStore) -> Option<String> {
        let (username, password) = self.credentials()?;
        match store.register(&username, &password) {
            Ok(()) => {}
            Err(e) if e.is_user_facing() => {
                self.message = Some(e.to_string());
                return None;
            }
            // Account exists in memory even if it could not be written
            Err(e) if store.contains(&username) => {
                log::warn!("Could not save new account {}: {}", username, e);
            }
            Err(e) => {
                log::warn!("Registration failed for {}: {}", username, e);
                self.message = Some(e.to_string());
                return None;
            }
        }
        self.clear();
        self.message = None;
        Some(username)
    }
}
