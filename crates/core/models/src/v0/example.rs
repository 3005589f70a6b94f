auto_derived!(
    /// # Example
    ///
    /// Demo record shared by the API and the page that renders it
    pub struct Example {
        /// Display name
        pub name: String,
        /// Age in years
        pub age: u32,
    }
);

impl Example {
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Example {
            name: name.into(),
            age,
        }
    }
}
