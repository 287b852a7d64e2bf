use serde::{Deserialize, Serialize};

pub const EMPLOYEES_COLLECTION: &str = "employees";

/// Profile strip shown at the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeInfo {
    pub department: String,
    pub job_title: String,
    pub employment_type: String,
    pub date_joined: String,
    pub status: String,
}

impl Default for EmployeeInfo {
    fn default() -> Self {
        Self {
            department: String::new(),
            job_title: String::new(),
            employment_type: String::new(),
            date_joined: String::new(),
            status: "Active".to_string(),
        }
    }
}

impl EmployeeInfo {
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), String> {
        let value = value.trim().to_string();
        match key {
            "department" => self.department = value,
            "jobTitle" | "job_title" => self.job_title = value,
            "employmentType" | "employment_type" => self.employment_type = value,
            "dateJoined" | "date_joined" => self.date_joined = value,
            "status" => self.status = value,
            _ => return Err(format!("Unknown profile field '{}'", key)),
        }
        Ok(())
    }
}
