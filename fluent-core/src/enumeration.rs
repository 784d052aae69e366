/// Lifecycle change of a named database enum type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseEnum {
    pub name: String,
    pub action: EnumAction,
    pub create_cases: Vec<String>,
    /// Cases to remove. PostgreSQL cannot drop enum values, drivers report and skip them.
    pub delete_cases: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumAction {
    Create,
    Update,
    Delete,
}

impl DatabaseEnum {
    pub fn new(name: impl Into<String>, action: EnumAction) -> Self {
        Self {
            name: name.into(),
            action,
            create_cases: Vec::new(),
            delete_cases: Vec::new(),
        }
    }

    pub fn create<S: Into<String>>(name: impl Into<String>, cases: impl IntoIterator<Item = S>) -> Self {
        Self::new(name, EnumAction::Create).add_cases(cases)
    }

    pub fn update(name: impl Into<String>) -> Self {
        Self::new(name, EnumAction::Update)
    }

    pub fn delete(name: impl Into<String>) -> Self {
        Self::new(name, EnumAction::Delete)
    }

    pub fn add_cases<S: Into<String>>(mut self, cases: impl IntoIterator<Item = S>) -> Self {
        self.create_cases.extend(cases.into_iter().map(Into::into));
        self
    }

    pub fn delete_cases<S: Into<String>>(mut self, cases: impl IntoIterator<Item = S>) -> Self {
        self.delete_cases.extend(cases.into_iter().map(Into::into));
        self
    }
}
