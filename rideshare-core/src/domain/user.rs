use chrono::NaiveDate;

/// A registered user.
///
/// Passwords are kept exactly as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct User {
    /// Identifier assigned at creation.
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Password as supplied.
    pub password: String,
    /// Free-text gender.
    pub gender: String,
    /// Contact phone number.
    pub phone: String,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Postal address.
    pub address: String,
    /// Free-text travel preferences.
    pub preferences: String,
}

impl User {
    /// Create an unsaved user with the mandatory contact details.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use rideshare_core::User;
    ///
    /// let birth = NaiveDate::from_ymd_opt(1990, 4, 12).unwrap_or_default();
    /// let user = User::new("Ivan", "ivan@example.com", "secret", birth);
    /// assert!(user.id.is_none());
    /// ```
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        birth_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            password: password.into(),
            birth_date,
            ..Self::default()
        }
    }

    /// Return the user with its identifier set.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}
