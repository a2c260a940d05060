use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

/// A single recorded measurement. `value` is NULL while the entry is pending.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "form_entry")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_name = "type")]
    pub form_type: String,
    pub date: DateTimeWithTimeZone,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub value: Option<Json>,
    pub units: String,
    pub data_type: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub validations: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Shape of `value`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "string")]
    Text,
    #[serde(rename = "boolean")]
    Boolean,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Number => "number",
            DataType::Text => "string",
            DataType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for DataType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "number" => Ok(DataType::Number),
            "string" => Ok(DataType::Text),
            "boolean" => Ok(DataType::Boolean),
            other => Err(ModelError::Validation(format!("unknown dataType '{other}'"))),
        }
    }
}

/// Constraints checked against every non-null `value` written to an entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<Json>>,
}

fn invalid(msg: impl Into<String>) -> ModelError { ModelError::Validation(msg.into()) }

pub fn validate_value(
    data_type: DataType,
    rules: &Validations,
    value: &Json,
) -> Result<(), ModelError> {
    match data_type {
        DataType::Number => {
            let n = value.as_f64().ok_or_else(|| invalid("value must be a number"))?;
            if let Some(min) = rules.min {
                if n < min { return Err(invalid(format!("value must be >= {min}"))); }
            }
            if let Some(max) = rules.max {
                if n > max { return Err(invalid(format!("value must be <= {max}"))); }
            }
        }
        DataType::Text => {
            let len = value.as_str().ok_or_else(|| invalid("value must be a string"))?.chars().count();
            if let Some(min) = rules.min_length {
                if len < min { return Err(invalid(format!("value must be at least {min} characters"))); }
            }
            if let Some(max) = rules.max_length {
                if len > max { return Err(invalid(format!("value must be at most {max} characters"))); }
            }
        }
        DataType::Boolean => {
            if !value.is_boolean() { return Err(invalid("value must be a boolean")); }
        }
    }
    if let Some(options) = rules.options.as_ref().filter(|o| !o.is_empty()) {
        if !options.contains(value) {
            return Err(invalid("value is not one of the allowed options"));
        }
    }
    Ok(())
}

/// JSON `null` and a missing value both mean "not filled in".
pub fn normalize_value(value: Option<Json>) -> Option<Json> {
    value.filter(|v| !v.is_null())
}

/// Input for [`create`]; `date` defaults to the submission time.
#[derive(Clone, Debug, PartialEq)]
pub struct NewForm {
    pub form_type: String,
    pub units: String,
    pub value: Option<Json>,
    pub date: Option<DateTime<Utc>>,
    pub data_type: DataType,
    pub validations: Validations,
}

impl NewForm {
    /// Validate and materialize the row that gets persisted.
    pub fn into_model(self, id: Uuid, now: DateTime<Utc>) -> Result<Model, ModelError> {
        if self.form_type.trim().is_empty() {
            return Err(invalid("type required"));
        }
        let value = normalize_value(self.value);
        if let Some(v) = &value {
            validate_value(self.data_type, &self.validations, v)?;
        }
        let validations = serde_json::to_value(&self.validations).map_err(|e| invalid(e.to_string()))?;
        let stamp: DateTimeWithTimeZone = now.into();
        Ok(Model {
            id,
            form_type: self.form_type,
            date: self.date.unwrap_or(now).into(),
            value,
            units: self.units,
            data_type: self.data_type.as_str().to_string(),
            validations,
            created_at: stamp,
            updated_at: stamp,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    Pending,
    Saved,
}

/// Client-facing projection of an entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDisplay {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub form_type: String,
    pub date: String,
    pub value: Option<Json>,
    pub units: String,
    pub data_type: String,
    pub validations: Validations,
    pub status: FormStatus,
}

impl Model {
    pub fn is_pending(&self) -> bool { self.value.is_none() }

    pub fn status(&self) -> FormStatus {
        if self.is_pending() { FormStatus::Pending } else { FormStatus::Saved }
    }

    pub fn parsed_data_type(&self) -> Result<DataType, ModelError> { self.data_type.parse() }

    pub fn parsed_validations(&self) -> Validations {
        serde_json::from_value(self.validations.clone()).unwrap_or_default()
    }

    /// Run the entry's own rules against a candidate value.
    pub fn check_value(&self, value: &Json) -> Result<(), ModelError> {
        validate_value(self.parsed_data_type()?, &self.parsed_validations(), value)
    }

    pub fn to_display(&self) -> FormDisplay {
        FormDisplay {
            id: self.id,
            form_type: self.form_type.clone(),
            date: self.date.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true),
            value: self.value.clone(),
            units: self.units.clone(),
            data_type: self.data_type.clone(),
            validations: self.parsed_validations(),
            status: self.status(),
        }
    }
}

fn db_err(e: DbErr) -> ModelError { ModelError::Db(e.to_string()) }

pub async fn create(db: &DatabaseConnection, new: NewForm) -> Result<Model, ModelError> {
    let m = new.into_model(Uuid::new_v4(), Utc::now())?;
    let am = ActiveModel {
        id: Set(m.id),
        form_type: Set(m.form_type),
        date: Set(m.date),
        value: Set(m.value),
        units: Set(m.units),
        data_type: Set(m.data_type),
        validations: Set(m.validations),
        created_at: Set(m.created_at),
        updated_at: Set(m.updated_at),
    };
    am.insert(db).await.map_err(db_err)
}

/// Replace only `value`, validating it against the stored rules. `Ok(None)` when `id` is unknown.
pub async fn update_value(
    db: &DatabaseConnection,
    id: Uuid,
    value: Json,
) -> Result<Option<Model>, ModelError> {
    let Some(existing) = Entity::find_by_id(id).one(db).await.map_err(db_err)? else {
        return Ok(None);
    };
    let value = normalize_value(Some(value));
    if let Some(v) = &value {
        existing.check_value(v)?;
    }
    let mut am: ActiveModel = existing.into();
    am.value = Set(value);
    am.updated_at = Set(Utc::now().into());
    updated_or_gone(am.update(db).await)
}

/// The row can be deleted between the lookup and the write; that reads as unknown.
fn updated_or_gone(res: Result<Model, DbErr>) -> Result<Option<Model>, ModelError> {
    match res {
        Ok(m) => Ok(Some(m)),
        Err(DbErr::RecordNotUpdated) => Ok(None),
        Err(e) => Err(db_err(e)),
    }
}
