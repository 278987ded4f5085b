//! Patient records and their one-hot encoded form.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::week::{CalendarWeek, Season};

/// Collapse internal whitespace and lowercase for attribute matching.
fn canonical(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Surgical classification of a patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatientType {
    /// `Qx`
    Surgical,
    /// `No Qx`
    NonSurgical,
}

impl PatientType {
    pub fn parse(raw: &str) -> Option<Self> {
        match canonical(raw).as_str() {
            "qx" => Some(Self::Surgical),
            "no qx" => Some(Self::NonSurgical),
            _ => None,
        }
    }
}

/// Urgency of an admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdmissionType {
    /// `Urgente`
    Urgent,
    /// `No Urgente`
    NonUrgent,
}

impl AdmissionType {
    pub fn parse(raw: &str) -> Option<Self> {
        match canonical(raw).as_str() {
            "urgente" => Some(Self::Urgent),
            "no urgente" => Some(Self::NonUrgent),
            _ => None,
        }
    }
}

/// One parsed row of the patient sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRecord {
    pub service_code: String,
    pub admitted_at: NaiveDateTime,
    pub length_of_stay_days: f64,
    pub patient_type: PatientType,
    pub admission_type: AdmissionType,
}

impl PatientRecord {
    pub fn week(&self) -> CalendarWeek {
        CalendarWeek::from_date(self.admitted_at.date())
    }

    pub fn season(&self) -> Season {
        Season::from_date(self.admitted_at.date())
    }
}

/// One-hot indicator columns, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Indicator {
    PatientNonSurgical,
    PatientSurgical,
    AdmissionNonUrgent,
    AdmissionUrgent,
    SeasonInvierno,
    SeasonOtono,
    SeasonPrimavera,
    SeasonVerano,
}

impl Indicator {
    pub const COUNT: usize = 8;

    pub const ALL: [Indicator; Self::COUNT] = [
        Indicator::PatientNonSurgical,
        Indicator::PatientSurgical,
        Indicator::AdmissionNonUrgent,
        Indicator::AdmissionUrgent,
        Indicator::SeasonInvierno,
        Indicator::SeasonOtono,
        Indicator::SeasonPrimavera,
        Indicator::SeasonVerano,
    ];

    /// Column base name; the output appends a `_lagN` suffix.
    pub fn column_name(self) -> &'static str {
        match self {
            Indicator::PatientNonSurgical => "tipo_paciente_no_qx",
            Indicator::PatientSurgical => "tipo_paciente_qx",
            Indicator::AdmissionNonUrgent => "tipo_ingreso_no_urgente",
            Indicator::AdmissionUrgent => "tipo_ingreso_urgente",
            Indicator::SeasonInvierno => "estacion_invierno",
            Indicator::SeasonOtono => "estacion_otono",
            Indicator::SeasonPrimavera => "estacion_primavera",
            Indicator::SeasonVerano => "estacion_verano",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn for_patient_type(value: PatientType) -> Self {
        match value {
            PatientType::NonSurgical => Indicator::PatientNonSurgical,
            PatientType::Surgical => Indicator::PatientSurgical,
        }
    }

    fn for_admission_type(value: AdmissionType) -> Self {
        match value {
            AdmissionType::NonUrgent => Indicator::AdmissionNonUrgent,
            AdmissionType::Urgent => Indicator::AdmissionUrgent,
        }
    }

    fn for_season(value: Season) -> Self {
        match value {
            Season::Invierno => Indicator::SeasonInvierno,
            Season::Otono => Indicator::SeasonOtono,
            Season::Primavera => Indicator::SeasonPrimavera,
            Season::Verano => Indicator::SeasonVerano,
        }
    }
}

/// Values for every [`Indicator`], indexed in output order.
///
/// For an encoded record each entry is 0 or 1; after aggregation each entry is
/// the share of the week's records carrying that indicator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndicatorVector([f64; Indicator::COUNT]);

impl IndicatorVector {
    /// One-hot vector with exactly one 1 per group.
    pub fn one_hot(patient_type: PatientType, admission_type: AdmissionType, season: Season) -> Self {
        let mut values = [0.0; Indicator::COUNT];
        values[Indicator::for_patient_type(patient_type).index()] = 1.0;
        values[Indicator::for_admission_type(admission_type).index()] = 1.0;
        values[Indicator::for_season(season).index()] = 1.0;
        Self(values)
    }

    pub fn from_values(values: [f64; Indicator::COUNT]) -> Self {
        Self(values)
    }

    pub fn get(&self, indicator: Indicator) -> f64 {
        self.0[indicator.index()]
    }

    pub fn values(&self) -> &[f64; Indicator::COUNT] {
        &self.0
    }

    /// Element-wise accumulate, used when averaging a week.
    pub fn accumulate(&mut self, other: &IndicatorVector) {
        for (total, value) in self.0.iter_mut().zip(other.0.iter()) {
            *total += value;
        }
    }

    /// Element-wise divide; a zero divisor leaves the vector unchanged.
    pub fn scaled(&self, divisor: f64) -> Self {
        if divisor == 0.0 {
            return *self;
        }
        let mut values = self.0;
        for value in &mut values {
            *value /= divisor;
        }
        Self(values)
    }
}

/// A joined, encoded patient record ready for weekly aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRecord {
    pub category: Category,
    pub week: CalendarWeek,
    pub length_of_stay_days: f64,
    pub indicators: IndicatorVector,
    /// Present only when the code survived low-frequency pruning.
    pub service_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_parsing_is_case_and_space_insensitive() {
        assert_eq!(PatientType::parse("  no   QX "), Some(PatientType::NonSurgical));
        assert_eq!(PatientType::parse("Qx"), Some(PatientType::Surgical));
        assert_eq!(PatientType::parse("Quirurgico"), None);
        assert_eq!(AdmissionType::parse("NO URGENTE"), Some(AdmissionType::NonUrgent));
        assert_eq!(AdmissionType::parse("urgente"), Some(AdmissionType::Urgent));
        assert_eq!(AdmissionType::parse(""), None);
    }

    #[test]
    fn one_hot_sets_one_flag_per_group() {
        let vector =
            IndicatorVector::one_hot(PatientType::Surgical, AdmissionType::Urgent, Season::Otono);
        let ones: Vec<Indicator> = Indicator::ALL
            .iter()
            .copied()
            .filter(|indicator| vector.get(*indicator) == 1.0)
            .collect();
        assert_eq!(
            ones,
            vec![
                Indicator::PatientSurgical,
                Indicator::AdmissionUrgent,
                Indicator::SeasonOtono
            ]
        );
        assert_eq!(vector.values().iter().sum::<f64>(), 3.0);
    }

    #[test]
    fn scaled_averages_accumulated_vectors() {
        let mut total = IndicatorVector::default();
        total.accumulate(&IndicatorVector::one_hot(
            PatientType::Surgical,
            AdmissionType::Urgent,
            Season::Verano,
        ));
        total.accumulate(&IndicatorVector::one_hot(
            PatientType::NonSurgical,
            AdmissionType::Urgent,
            Season::Verano,
        ));
        let mean = total.scaled(2.0);
        assert_eq!(mean.get(Indicator::PatientSurgical), 0.5);
        assert_eq!(mean.get(Indicator::PatientNonSurgical), 0.5);
        assert_eq!(mean.get(Indicator::AdmissionUrgent), 1.0);
        assert_eq!(mean.get(Indicator::SeasonInvierno), 0.0);
    }

    #[test]
    fn column_names_are_ascii() {
        assert!(Indicator::ALL.iter().all(|i| i.column_name().is_ascii()));
    }
}
