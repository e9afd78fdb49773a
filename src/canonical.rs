//! Canonical output fields and their per-field coercion rules.
//!
//! [`CanonicalField`] is the fixed vocabulary the rest of the pipeline reasons
//! about. Each field carries an explicit [`Coercion`] rule, so per-column
//! branching is an exhaustive match rather than name comparisons scattered
//! through the cleaning code.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    ReportYear,
    ReportMonth,
    CityMunicipality,
    AdministrativeCodeAtvk,
    TotalInsuredPersons,
    AverageInsurableSalaryTotal,
    InsuredWomenCount,
    InsuredWomenAverageSalary,
    InsuredMenCount,
    InsuredMenAverageSalary,
    EmployeesCount,
    EmployeesAverageSalary,
    FemaleEmployeesCount,
    FemaleEmployeesAverageSalary,
    MaleEmployeesCount,
    MaleEmployeesAverageSalary,
    SelfEmployedCount,
    SelfEmployedAverageSalary,
    FemaleSelfEmployedCount,
    FemaleSelfEmployedAverageSalary,
    MaleSelfEmployedCount,
    MaleSelfEmployedAverageSalary,
    RegionSalaryLevel,
    WageGapMaleFemale,
    MaleFemaleEmployeeRatio,
}

/// Conversion rule applied to a canonical column during type coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Left as text, untouched.
    Text,
    /// Converted to text, trailing ".0" artifact stripped, zero-padded to a
    /// fixed width.
    AdminCode,
    /// Converted to numeric; unparseable values become the missing marker.
    Numeric,
}

/// Width administrative territory codes are zero-padded to.
pub const ADMIN_CODE_WIDTH: usize = 7;

/// The fixed column order the persistence boundary requires. Report_Month is
/// absent: it is recognized by the dictionary only to be discarded.
pub const EXPECTED_COLUMNS: [CanonicalField; 24] = [
    CanonicalField::ReportYear,
    CanonicalField::CityMunicipality,
    CanonicalField::AdministrativeCodeAtvk,
    CanonicalField::TotalInsuredPersons,
    CanonicalField::AverageInsurableSalaryTotal,
    CanonicalField::InsuredWomenCount,
    CanonicalField::InsuredWomenAverageSalary,
    CanonicalField::InsuredMenCount,
    CanonicalField::InsuredMenAverageSalary,
    CanonicalField::EmployeesCount,
    CanonicalField::EmployeesAverageSalary,
    CanonicalField::FemaleEmployeesCount,
    CanonicalField::FemaleEmployeesAverageSalary,
    CanonicalField::MaleEmployeesCount,
    CanonicalField::MaleEmployeesAverageSalary,
    CanonicalField::SelfEmployedCount,
    CanonicalField::SelfEmployedAverageSalary,
    CanonicalField::FemaleSelfEmployedCount,
    CanonicalField::FemaleSelfEmployedAverageSalary,
    CanonicalField::MaleSelfEmployedCount,
    CanonicalField::MaleSelfEmployedAverageSalary,
    CanonicalField::RegionSalaryLevel,
    CanonicalField::WageGapMaleFemale,
    CanonicalField::MaleFemaleEmployeeRatio,
];

impl CanonicalField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::ReportYear => "Report_Year",
            CanonicalField::ReportMonth => "Report_Month",
            CanonicalField::CityMunicipality => "City_Municipality",
            CanonicalField::AdministrativeCodeAtvk => "Administrative_Code_ATVK",
            CanonicalField::TotalInsuredPersons => {
                "Total_Insured_Persons_Employees_Self_Employed"
            }
            CanonicalField::AverageInsurableSalaryTotal => "Average_Insurable_Salary_Total",
            CanonicalField::InsuredWomenCount => "Insured_Women_Count",
            CanonicalField::InsuredWomenAverageSalary => "Insured_Women_Average_Salary",
            CanonicalField::InsuredMenCount => "Insured_Men_Count",
            CanonicalField::InsuredMenAverageSalary => "Insured_Men_Average_Salary",
            CanonicalField::EmployeesCount => "Employees_Count",
            CanonicalField::EmployeesAverageSalary => "Employees_Average_Salary",
            CanonicalField::FemaleEmployeesCount => "Female_Employees_Count",
            CanonicalField::FemaleEmployeesAverageSalary => "Female_Employees_Average_Salary",
            CanonicalField::MaleEmployeesCount => "Male_Employees_Count",
            CanonicalField::MaleEmployeesAverageSalary => "Male_Employees_Average_Salary",
            CanonicalField::SelfEmployedCount => "Self_Employed_Count",
            CanonicalField::SelfEmployedAverageSalary => "Self_Employed_Average_Salary",
            CanonicalField::FemaleSelfEmployedCount => "Female_Self_Employed_Count",
            CanonicalField::FemaleSelfEmployedAverageSalary => {
                "Female_Self_Employed_Average_Salary"
            }
            CanonicalField::MaleSelfEmployedCount => "Male_Self_Employed_Count",
            CanonicalField::MaleSelfEmployedAverageSalary => "Male_Self_Employed_Average_Salary",
            CanonicalField::RegionSalaryLevel => "Region_Salary_Level",
            CanonicalField::WageGapMaleFemale => "Wage_Gap_Male_Female",
            CanonicalField::MaleFemaleEmployeeRatio => "Male_Female_Employee_Ratio",
        }
    }

    pub fn coercion(&self) -> Coercion {
        match self {
            CanonicalField::ReportYear
            | CanonicalField::CityMunicipality
            | CanonicalField::RegionSalaryLevel => Coercion::Text,
            CanonicalField::AdministrativeCodeAtvk => Coercion::AdminCode,
            _ => Coercion::Numeric,
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CanonicalField {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        EXPECTED_COLUMNS
            .iter()
            .chain(std::iter::once(&CanonicalField::ReportMonth))
            .find(|field| field.as_str() == trimmed)
            .copied()
            .ok_or_else(|| anyhow!("Unknown canonical field '{value}'"))
    }
}

impl Serialize for CanonicalField {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CanonicalField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        CanonicalField::from_str(&token).map_err(|err| de::Error::custom(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_columns_start_with_keys_and_end_with_derived_fields() {
        assert_eq!(EXPECTED_COLUMNS.len(), 24);
        assert_eq!(EXPECTED_COLUMNS[0], CanonicalField::ReportYear);
        assert_eq!(
            EXPECTED_COLUMNS[23],
            CanonicalField::MaleFemaleEmployeeRatio
        );
        assert!(!EXPECTED_COLUMNS.contains(&CanonicalField::ReportMonth));
    }

    #[test]
    fn coercion_rules_follow_field_kind() {
        assert_eq!(CanonicalField::ReportYear.coercion(), Coercion::Text);
        assert_eq!(
            CanonicalField::AdministrativeCodeAtvk.coercion(),
            Coercion::AdminCode
        );
        assert_eq!(
            CanonicalField::EmployeesAverageSalary.coercion(),
            Coercion::Numeric
        );
        assert_eq!(CanonicalField::RegionSalaryLevel.coercion(), Coercion::Text);
    }

    #[test]
    fn round_trips_through_canonical_names() {
        for field in EXPECTED_COLUMNS {
            assert_eq!(CanonicalField::from_str(field.as_str()).unwrap(), field);
        }
        assert_eq!(
            CanonicalField::from_str("Report_Month").unwrap(),
            CanonicalField::ReportMonth
        );
        assert!(CanonicalField::from_str("Unknown_Field").is_err());
    }
}
