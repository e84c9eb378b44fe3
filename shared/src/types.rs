//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Physical dimension a unit measures
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Mass,
    Volume,
    Count,
}

impl UnitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitType::Mass => "mass",
            UnitType::Volume => "volume",
            UnitType::Count => "count",
        }
    }

    /// Symbol of the base unit every quantity of this type is normalized to
    pub fn base_symbol(&self) -> &'static str {
        match self {
            UnitType::Mass => "g",
            UnitType::Volume => "ml",
            UnitType::Count => "pc",
        }
    }
}

impl std::str::FromStr for UnitType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mass" => Ok(UnitType::Mass),
            "volume" => Ok(UnitType::Volume),
            "count" => Ok(UnitType::Count),
            _ => Err("Unknown unit type"),
        }
    }
}

impl std::fmt::Display for UnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of an organization member
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeRole {
    Owner,
    Manager,
    #[default]
    Staff,
}

impl EmployeeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeRole::Owner => "OWNER",
            EmployeeRole::Manager => "MANAGER",
            EmployeeRole::Staff => "STAFF",
        }
    }

    /// Owners and managers may hire, edit and remove staff
    pub fn can_manage_employees(&self) -> bool {
        matches!(self, EmployeeRole::Owner | EmployeeRole::Manager)
    }
}

impl std::str::FromStr for EmployeeRole {
    type Err = &'static str;

    /// Accepts any casing (`STAFF` and `staff` are both sent by clients)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OWNER" => Ok(EmployeeRole::Owner),
            "MANAGER" => Ok(EmployeeRole::Manager),
            "STAFF" => Ok(EmployeeRole::Staff),
            _ => Err("Role must be one of OWNER, MANAGER, STAFF"),
        }
    }
}

impl std::fmt::Display for EmployeeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_parsing_is_case_insensitive() {
        assert_eq!(EmployeeRole::from_str("staff"), Ok(EmployeeRole::Staff));
        assert_eq!(EmployeeRole::from_str("Manager"), Ok(EmployeeRole::Manager));
        assert!(EmployeeRole::from_str("chef").is_err());
    }

    #[test]
    fn test_role_serializes_uppercase() {
        let json = serde_json::to_string(&EmployeeRole::Owner).unwrap();
        assert_eq!(json, "\"OWNER\"");
    }

    #[test]
    fn test_only_owner_and_manager_manage_employees() {
        assert!(EmployeeRole::Owner.can_manage_employees());
        assert!(EmployeeRole::Manager.can_manage_employees());
        assert!(!EmployeeRole::Staff.can_manage_employees());
    }

    #[test]
    fn test_unit_type_base_symbols() {
        assert_eq!(UnitType::Mass.base_symbol(), "g");
        assert_eq!(UnitType::Volume.base_symbol(), "ml");
        assert_eq!(UnitType::from_str("count"), Ok(UnitType::Count));
    }
}
