//! Semester entity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dto::SemesterDto;
use crate::id::{IdGenerator, SemesterId};
use crate::model::error::{DomainError, Result, required_text};

const MAX_NAME_LENGTH: usize = 100;
const MAX_SCHOOL_YEAR_LENGTH: usize = 20;

/// Academic term. `end_date` is always strictly after `start_date`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SemesterDto")]
pub struct Semester {
    id: SemesterId,
    name: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    school_year: String,
    is_active: bool,
}

/// Checked editable fields of a [`Semester`].
struct Fields {
    name: String,
    school_year: String,
}

impl Fields {
    fn check(body: &SemesterDto) -> Result<Self> {
        if body.end_date <= body.start_date {
            return Err(DomainError::validation(
                "endDate",
                "end date must be after start date",
            ));
        }

        Ok(Self {
            name: required_text("name", &body.name, MAX_NAME_LENGTH)?,
            school_year: required_text(
                "schoolYear",
                &body.school_year,
                MAX_SCHOOL_YEAR_LENGTH,
            )?,
        })
    }
}

impl Semester {
    /// Create a new [`Semester`], keeping `body.id` if one is supplied.
    pub fn new(ids: &dyn IdGenerator, body: &SemesterDto) -> Result<Self> {
        let Fields { name, school_year } = Fields::check(body)?;

        Ok(Self {
            id: SemesterId::or_generate(body.id, ids),
            name,
            start_date: body.start_date,
            end_date: body.end_date,
            school_year,
            is_active: body.is_active,
        })
    }

    pub fn id(&self) -> SemesterId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn school_year(&self) -> &str {
        &self.school_year
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Replaces every editable field. `body.id` is ignored.
    pub fn update(&mut self, body: &SemesterDto) -> Result<()> {
        let Fields { name, school_year } = Fields::check(body)?;

        self.name = name;
        self.start_date = body.start_date;
        self.end_date = body.end_date;
        self.school_year = school_year;
        self.is_active = body.is_active;
        Ok(())
    }

    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    /// Whether `date` falls within the term, bounds included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

impl TryFrom<SemesterDto> for Semester {
    type Error = DomainError;

    /// Rebuilds a stored semester; its identifier must be present.
    fn try_from(body: SemesterDto) -> Result<Self> {
        let id = body
            .id
            .filter(|id| !id.as_uuid().is_nil())
            .ok_or_else(|| DomainError::validation("id", "missing identifier"))?;
        let Fields { name, school_year } = Fields::check(&body)?;

        Ok(Self {
            id,
            name,
            start_date: body.start_date,
            end_date: body.end_date,
            school_year,
            is_active: body.is_active,
        })
    }
}

impl From<&Semester> for SemesterDto {
    fn from(semester: &Semester) -> Self {
        Self {
            id: Some(semester.id),
            name: semester.name.clone(),
            start_date: semester.start_date,
            end_date: semester.end_date,
            school_year: semester.school_year.clone(),
            is_active: semester.is_active,
        }
    }
}
