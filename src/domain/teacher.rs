use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    domain::{contains_ci, lenient, normalized_search, unknown_time, validation},
    error::Result,
};

pub const DEPARTMENTS: &[&str] = &[
    "Mathematics", "Science", "English", "Social Studies", "Languages",
    "Arts", "Physical Education", "Technology", "Special Education",
];

pub const EMPLOYMENT_TYPES: &[&str] = &["Full-time", "Part-time", "Contract", "Substitute"];

pub const TITLES: &[&str] = &["Mr.", "Mrs.", "Ms.", "Dr.", "Prof."];

/// Teacher profile. Every section is defaulted when it is absent from the
/// stored document, and flat records from the first data layout
/// (`name`, `department`, `bio`, `photoUrl`) are folded into the sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", from = "TeacherRecord")]
pub struct Teacher {
    pub id: String,
    pub basic_info: BasicInfo,
    pub contact_info: ContactInfo,
    pub professional_info: ProfessionalInfo,
    pub employment_details: EmploymentDetails,
    pub academic_responsibilities: AcademicResponsibilities,
    pub additional_info: AdditionalInfo,
    pub documents: TeacherDocuments,
    pub status: TeacherStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct BasicInfo {
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<String>,
    pub gender: String,
    pub nationality: Option<String>,
    pub photo_url: Option<String>,
    pub signature: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactInfo {
    pub email: String,
    pub phone: Option<String>,
    pub emergency_contact: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfessionalInfo {
    pub employee_id: String,
    pub department: String,
    pub subjects: Vec<String>,
    pub grade_levels: Vec<String>,
    pub specialization: Option<String>,
    pub qualification: Option<String>,
    pub degree: Option<String>,
    pub university: Option<String>,
    pub year_of_graduation: Option<String>,
    pub teaching_license_number: Option<String>,
    pub license_expiry: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EmploymentDetails {
    pub employment_type: String,
    pub join_date: Option<String>,
    pub contract_end_date: Option<String>,
    pub salary_scale: Option<String>,
    pub payroll_number: Option<String>,
    pub bank_details: BankDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct BankDetails {
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    pub branch: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AcademicResponsibilities {
    pub homeroom_teacher: bool,
    pub class_teacher_of: Option<String>,
    pub club_sponsor: Option<String>,
    pub committee_membership: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AdditionalInfo {
    pub bio: Option<String>,
    pub teaching_philosophy: Option<String>,
    pub achievements: Option<String>,
    pub professional_goals: Option<String>,
}

/// Uploaded file references. Certificates keep whatever shape was stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct TeacherDocuments {
    pub resume: Option<String>,
    pub certificates: Vec<Value>,
    pub police_clearance: Option<String>,
    pub medical_report: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TeacherStatus {
    #[default]
    Active,
    #[serde(rename = "On Leave")]
    OnLeave,
    Resigned,
    Retired,
    Archived,
}

impl Default for BasicInfo {
    fn default() -> Self {
        Self {
            title: "Mr.".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            date_of_birth: None,
            gender: "Male".to_string(),
            nationality: None,
            photo_url: None,
            signature: None,
        }
    }
}

impl Default for EmploymentDetails {
    fn default() -> Self {
        Self {
            employment_type: "Full-time".to_string(),
            join_date: None,
            contract_end_date: None,
            salary_scale: None,
            payroll_number: None,
            bank_details: BankDetails::default(),
        }
    }
}

/// Wire shape accepted on read, covering both the sectioned and the flat layout.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeacherRecord {
    #[serde(default)]
    id: String,
    #[serde(default)]
    basic_info: Option<BasicInfo>,
    #[serde(default)]
    contact_info: Option<ContactInfo>,
    #[serde(default)]
    professional_info: Option<ProfessionalInfo>,
    #[serde(default)]
    employment_details: Option<EmploymentDetails>,
    #[serde(default)]
    academic_responsibilities: Option<AcademicResponsibilities>,
    #[serde(default)]
    additional_info: Option<AdditionalInfo>,
    #[serde(default)]
    documents: Option<TeacherDocuments>,
    #[serde(default)]
    status: TeacherStatus,
    #[serde(default = "unknown_time", deserialize_with = "lenient::timestamp::deserialize")]
    created_at: DateTime<Utc>,
    #[serde(default = "unknown_time", deserialize_with = "lenient::timestamp::deserialize")]
    updated_at: DateTime<Utc>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Splits a leading honorific such as `Dr.` off a display name.
fn split_title(name: &str) -> (Option<&'static str>, &str) {
    let name = name.trim();
    let (first, rest) = name.split_once(char::is_whitespace).unwrap_or((name, ""));
    let bare = first.trim_end_matches('.');
    TITLES
        .iter()
        .find(|title| title.trim_end_matches('.').eq_ignore_ascii_case(bare))
        .map_or((None, name), |title| (Some(*title), rest.trim_start()))
}

impl From<TeacherRecord> for Teacher {
    fn from(record: TeacherRecord) -> Self {
        let flat = record.basic_info.is_none();
        let mut basic_info = record.basic_info.unwrap_or_default();
        if let Some(name) = record.name.as_deref() {
            let (title, name) = split_title(name);
            if let (true, Some(title)) = (flat, title) {
                basic_info.title = title.to_string();
            }
            let mut parts = name.split_whitespace();
            if basic_info.first_name.is_empty() {
                basic_info.first_name = parts.next().unwrap_or_default().to_string();
            }
            if basic_info.last_name.is_empty() {
                basic_info.last_name = parts.collect::<Vec<_>>().join(" ");
            }
        }
        if basic_info.photo_url.is_none() {
            basic_info.photo_url = record.photo_url;
        }

        let mut professional_info = record.professional_info.unwrap_or_default();
        if professional_info.department.is_empty() {
            professional_info.department = record.department.unwrap_or_default();
        }

        let mut additional_info = record.additional_info.unwrap_or_default();
        if additional_info.bio.is_none() {
            additional_info.bio = record.bio;
        }

        Teacher {
            id: record.id,
            basic_info,
            contact_info: record.contact_info.unwrap_or_default(),
            professional_info,
            employment_details: record.employment_details.unwrap_or_default(),
            academic_responsibilities: record.academic_responsibilities.unwrap_or_default(),
            additional_info,
            documents: record.documents.unwrap_or_default(),
            status: record.status,
            created_at: record.created_at,
            updated_at: record.updated_at,
            extra: record.extra,
        }
    }
}

/// Form data for creating or replacing a teacher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct TeacherInput {
    pub basic_info: BasicInfo,
    pub contact_info: ContactInfo,
    pub professional_info: ProfessionalInfo,
    pub employment_details: EmploymentDetails,
    pub academic_responsibilities: AcademicResponsibilities,
    pub additional_info: AdditionalInfo,
    pub documents: TeacherDocuments,
    pub status: TeacherStatus,
}

impl TeacherInput {
    pub fn validate(&self) -> Result<()> {
        validation::require("firstName", &self.basic_info.first_name)?;
        validation::require("lastName", &self.basic_info.last_name)?;
        validation::require_email("email", &self.contact_info.email)?;
        validation::require("employeeId", &self.professional_info.employee_id)?;
        validation::require("department", &self.professional_info.department)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeacherFilter {
    pub department: Option<String>,
    pub subject: Option<String>,
    pub grade_level: Option<String>,
    pub employment_type: Option<String>,
    pub status: Option<TeacherStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TeacherStats {
    pub total: usize,
    pub active: usize,
    pub on_leave: usize,
    /// Every known department, including those with no teachers.
    pub by_department: BTreeMap<String, usize>,
}

impl TeacherStats {
    pub fn from_slice(teachers: &[Teacher]) -> Self {
        let mut by_department: BTreeMap<String, usize> =
            DEPARTMENTS.iter().map(|d| (d.to_string(), 0)).collect();
        for teacher in teachers {
            if let Some(count) = by_department.get_mut(&teacher.professional_info.department) {
                *count += 1;
            }
        }

        TeacherStats {
            total: teachers.len(),
            active: teachers.iter().filter(|t| t.status == TeacherStatus::Active).count(),
            on_leave: teachers.iter().filter(|t| t.status == TeacherStatus::OnLeave).count(),
            by_department,
        }
    }
}

impl TeacherStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeacherStatus::Active => "Active",
            TeacherStatus::OnLeave => "On Leave",
            TeacherStatus::Resigned => "Resigned",
            TeacherStatus::Retired => "Retired",
            TeacherStatus::Archived => "Archived",
        }
    }
}

impl Teacher {
    pub fn from_input(id: String, input: TeacherInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            basic_info: input.basic_info,
            contact_info: input.contact_info,
            professional_info: input.professional_info,
            employment_details: input.employment_details,
            academic_responsibilities: input.academic_responsibilities,
            additional_info: input.additional_info,
            documents: input.documents,
            status: input.status,
            created_at: now,
            updated_at: now,
            extra: Map::new(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.basic_info.first_name, self.basic_info.last_name)
            .trim()
            .to_string()
    }
}

impl TeacherFilter {
    pub fn matches(&self, teacher: &Teacher, search: Option<&str>) -> bool {
        let professional = &teacher.professional_info;

        if let Some(department) = &self.department {
            if &professional.department != department {
                return false;
            }
        }
        if let Some(subject) = &self.subject {
            if !professional.subjects.contains(subject) {
                return false;
            }
        }
        if let Some(grade) = &self.grade_level {
            if !professional.grade_levels.contains(grade) {
                return false;
            }
        }
        if let Some(employment_type) = &self.employment_type {
            if &teacher.employment_details.employment_type != employment_type {
                return false;
            }
        }
        if let Some(status) = self.status {
            if teacher.status != status {
                return false;
            }
        }
        if let Some(needle) = search {
            let hit = contains_ci(&teacher.basic_info.first_name, needle)
                || contains_ci(&teacher.basic_info.last_name, needle)
                || contains_ci(&professional.employee_id, needle)
                || contains_ci(&teacher.contact_info.email, needle);
            if !hit {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, teachers: Vec<Teacher>) -> Vec<Teacher> {
        let search = normalized_search(&self.search);
        teachers
            .into_iter()
            .filter(|t| self.matches(t, search.as_deref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_records_are_folded_into_sections() {
        let json = r#"{
            "id": "1",
            "name": "Dr. Sarah Johnson",
            "department": "Mathematics",
            "bio": "PhD in Mathematics.",
            "photoUrl": "https://images.example.com/sarah.jpg"
        }"#;
        let teacher: Teacher = serde_json::from_str(json).unwrap();
        assert_eq!(teacher.basic_info.title, "Dr.");
        assert_eq!(teacher.basic_info.first_name, "Sarah");
        assert_eq!(teacher.basic_info.last_name, "Johnson");
        assert_eq!(teacher.professional_info.department, "Mathematics");
        assert_eq!(teacher.additional_info.bio.as_deref(), Some("PhD in Mathematics."));
        assert_eq!(
            teacher.basic_info.photo_url.as_deref(),
            Some("https://images.example.com/sarah.jpg")
        );
        assert_eq!(teacher.status, TeacherStatus::Active);
        assert_eq!(teacher.employment_details.employment_type, "Full-time");
    }

    #[test]
    fn flat_names_without_a_title_keep_the_default() {
        let teacher: Teacher =
            serde_json::from_str(r#"{"id": "2", "name": "Michael Chen", "department": "Science"}"#).unwrap();
        assert_eq!(teacher.basic_info.title, "Mr.");
        assert_eq!(teacher.basic_info.first_name, "Michael");
        assert_eq!(teacher.basic_info.last_name, "Chen");

        let teacher: Teacher = serde_json::from_str(r#"{"id": "3", "name": "prof Ada King Lovelace"}"#).unwrap();
        assert_eq!(teacher.basic_info.title, "Prof.");
        assert_eq!(teacher.basic_info.first_name, "Ada");
        assert_eq!(teacher.basic_info.last_name, "King Lovelace");
    }

    #[test]
    fn unknown_keys_and_documents_survive_a_rewrite() {
        let json = r#"{
            "id": "4",
            "basicInfo": {"firstName": "Grace", "lastName": "Hopper", "signature": "sig.png"},
            "documents": {"resume": "cv.pdf", "certificates": ["navy.pdf"]},
            "badgeColour": "blue"
        }"#;
        let teacher: Teacher = serde_json::from_str(json).unwrap();
        assert_eq!(teacher.basic_info.signature.as_deref(), Some("sig.png"));
        assert_eq!(teacher.documents.resume.as_deref(), Some("cv.pdf"));

        let stored = serde_json::to_value(&teacher).unwrap();
        assert_eq!(stored["badgeColour"], "blue");
        assert_eq!(stored["documents"]["certificates"][0], "navy.pdf");
        assert_eq!(serde_json::from_value::<Teacher>(stored).unwrap(), teacher);
    }

    #[test]
    fn stats_count_status_and_known_departments() {
        let teachers: Vec<Teacher> = serde_json::from_str(
            r#"[
                {"id": "1", "name": "Ann Lee", "department": "Science"},
                {"id": "2", "name": "Bo Park", "department": "Science", "status": "On Leave"},
                {"id": "3", "name": "Cy Diaz", "department": "Astrology", "status": "Retired"}
            ]"#,
        )
        .unwrap();

        let stats = TeacherStats::from_slice(&teachers);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.on_leave, 1);
        assert_eq!(stats.by_department["Science"], 2);
        assert_eq!(stats.by_department["Mathematics"], 0);
        assert!(!stats.by_department.contains_key("Astrology"));
        assert_eq!(stats.by_department.len(), DEPARTMENTS.len());
    }

    #[test]
    fn sectioned_records_round_trip_through_storage_shape() {
        let json = r#"{
            "id": "9",
            "basicInfo": {"firstName": "Ada", "lastName": "Lovelace"},
            "contactInfo": {"email": "ada@school.com"},
            "professionalInfo": {"employeeId": "T-9", "department": "Technology", "subjects": ["Computer Science"]},
            "status": "On Leave",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-02T00:00:00Z"
        }"#;
        let teacher: Teacher = serde_json::from_str(json).unwrap();
        assert_eq!(teacher.status, TeacherStatus::OnLeave);

        let stored = serde_json::to_value(&teacher).unwrap();
        assert_eq!(stored["status"], "On Leave");
        assert_eq!(stored["professionalInfo"]["employeeId"], "T-9");

        let reread: Teacher = serde_json::from_value(stored).unwrap();
        assert_eq!(reread, teacher);
    }

    #[test]
    fn validation_requires_identity_fields() {
        let mut input = TeacherInput::default();
        input.basic_info.first_name = "Ada".into();
        input.basic_info.last_name = "Lovelace".into();
        input.contact_info.email = "ada@school".into();
        input.professional_info.employee_id = "T-1".into();
        input.professional_info.department = "Technology".into();
        assert!(input.validate().is_err());

        input.contact_info.email = "ada@school.com".into();
        assert!(input.validate().is_ok());

        input.professional_info.department.clear();
        assert!(input.validate().is_err());
    }
}
