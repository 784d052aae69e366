use crate::{SqlExpression, Value};

/// Table level DDL change.
#[derive(Debug, Clone)]
pub struct DatabaseSchema {
    pub action: SchemaAction,
    pub schema: String,
    pub space: Option<String>,
    pub create_fields: Vec<FieldDefinition>,
    pub update_fields: Vec<FieldUpdate>,
    pub delete_fields: Vec<String>,
    pub create_constraints: Vec<ConstraintDefinition>,
    pub delete_constraints: Vec<ConstraintDelete>,
    /// When false a create does not fail if the table already exists.
    pub exclusive_create: bool,
    /// When true a delete does not fail if the table is missing.
    pub if_exists: bool,
}

impl DatabaseSchema {
    pub fn new(action: SchemaAction, schema: impl Into<String>) -> Self {
        Self {
            action,
            schema: schema.into(),
            space: None,
            create_fields: Vec::new(),
            update_fields: Vec::new(),
            delete_fields: Vec::new(),
            create_constraints: Vec::new(),
            delete_constraints: Vec::new(),
            exclusive_create: true,
            if_exists: false,
        }
    }

    pub fn create(schema: impl Into<String>) -> Self {
        Self::new(SchemaAction::Create, schema)
    }

    pub fn update(schema: impl Into<String>) -> Self {
        Self::new(SchemaAction::Update, schema)
    }

    pub fn delete(schema: impl Into<String>) -> Self {
        Self::new(SchemaAction::Delete, schema)
    }

    pub fn space(mut self, space: impl Into<String>) -> Self {
        self.space = Some(space.into());
        self
    }

    pub fn field(
        mut self,
        name: impl Into<String>,
        data_type: DataType,
        constraints: impl IntoIterator<Item = FieldConstraint>,
    ) -> Self {
        self.create_fields.push(FieldDefinition {
            name: name.into(),
            data_type,
            constraints: constraints.into_iter().collect(),
        });
        self
    }

    pub fn update_field(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        self.update_fields.push(FieldUpdate {
            name: name.into(),
            data_type,
        });
        self
    }

    pub fn delete_field(mut self, name: impl Into<String>) -> Self {
        self.delete_fields.push(name.into());
        self
    }

    pub fn constraint(mut self, constraint: ConstraintDefinition) -> Self {
        self.create_constraints.push(constraint);
        self
    }

    pub fn delete_constraint(mut self, constraint: ConstraintDelete) -> Self {
        self.delete_constraints.push(constraint);
        self
    }

    pub fn ignore_existing(mut self) -> Self {
        self.exclusive_create = false;
        self
    }

    pub fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaAction {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    String,
    Time,
    Date,
    Datetime,
    Float,
    Double,
    Decimal,
    Data,
    Uuid,
    /// Database enum type, created separately through a `DatabaseEnum`.
    Enum {
        name: String,
        cases: Vec<String>,
    },
    Array(Box<DataType>),
    /// Structured value stored as a JSON document.
    Dictionary,
    Custom(SqlExpression),
}

impl DataType {
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub name: String,
    pub data_type: DataType,
    pub constraints: Vec<FieldConstraint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldUpdate {
    pub name: String,
    pub data_type: DataType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ForeignKeyAction {
    #[default]
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub schema: String,
    pub space: Option<String>,
    pub fields: Vec<String>,
    pub on_delete: ForeignKeyAction,
    pub on_update: ForeignKeyAction,
}

impl ForeignKey {
    pub fn new<S: Into<String>>(schema: impl Into<String>, fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            schema: schema.into(),
            space: None,
            fields: fields.into_iter().map(Into::into).collect(),
            on_delete: ForeignKeyAction::NoAction,
            on_update: ForeignKeyAction::NoAction,
        }
    }

    pub fn on_delete(mut self, action: ForeignKeyAction) -> Self {
        self.on_delete = action;
        self
    }

    pub fn on_update(mut self, action: ForeignKeyAction) -> Self {
        self.on_update = action;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldConstraint {
    Required,
    /// Primary key, generated by the database when `auto` is set on an integer field.
    Identifier { auto: bool },
    ForeignKey(ForeignKey),
    Default(Value),
    Custom(SqlExpression),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintAlgorithm {
    Unique(Vec<String>),
    CompositeIdentifier(Vec<String>),
    ForeignKey {
        fields: Vec<String>,
        foreign: ForeignKey,
    },
    Custom(SqlExpression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintDefinition {
    pub name: Option<String>,
    pub algorithm: ConstraintAlgorithm,
}

impl ConstraintDefinition {
    pub fn unique<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: None,
            algorithm: ConstraintAlgorithm::Unique(fields.into_iter().map(Into::into).collect()),
        }
    }

    pub fn composite_identifier<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: None,
            algorithm: ConstraintAlgorithm::CompositeIdentifier(
                fields.into_iter().map(Into::into).collect(),
            ),
        }
    }

    pub fn foreign_key<S: Into<String>>(fields: impl IntoIterator<Item = S>, foreign: ForeignKey) -> Self {
        Self {
            name: None,
            algorithm: ConstraintAlgorithm::ForeignKey {
                fields: fields.into_iter().map(Into::into).collect(),
                foreign,
            },
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name used when none was given, `None` for constraints without a derivable name.
    pub fn default_name(&self, table: &str) -> Option<String> {
        self.algorithm.default_name(table)
    }
}

impl ConstraintAlgorithm {
    /// `uq:<table>.<fields+>` and `fk:<table>.<fields+>_<foreign>.<fields+>`.
    pub fn default_name(&self, table: &str) -> Option<String> {
        match self {
            ConstraintAlgorithm::Unique(fields) => {
                Some(format!("uq:{}.{}", table, fields.join("+")))
            }
            ConstraintAlgorithm::ForeignKey { fields, foreign } => Some(format!(
                "fk:{}.{}_{}.{}",
                table,
                fields.join("+"),
                foreign.schema,
                foreign.fields.join("+")
            )),
            ConstraintAlgorithm::CompositeIdentifier(..) | ConstraintAlgorithm::Custom(..) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintDelete {
    Name(String),
    /// Deletes the constraint carrying the default name of the algorithm.
    Algorithm(ConstraintAlgorithm),
}
