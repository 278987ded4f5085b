//! Weekly ward summaries reported after a week closes.
//!
//! A summary carries the counts a ward reports for the week that just ended.
//! The update flow uses it to backfill that week's demand and to build the
//! lag-1 features of the following week.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SummaryError;
use crate::record::{Indicator, IndicatorVector};
use crate::week::{CalendarWeek, Season};

/// Counts reported for one category and one closed week.
///
/// Field aliases accept the column names used by the ward's weekly form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    /// Any day of the reported week.
    #[serde(alias = "Fecha ingreso")]
    pub reported_on: NaiveDate,
    #[serde(alias = "Demanda pacientes")]
    pub demand: u32,
    #[serde(alias = "Estancia (días promedio)")]
    pub mean_length_of_stay: f64,
    #[serde(alias = "Pacientes no Qx")]
    pub non_surgical: u32,
    #[serde(alias = "Pacientes Qx")]
    pub surgical: u32,
    #[serde(alias = "Ingresos no urgentes")]
    pub non_urgent: u32,
    #[serde(alias = "Ingresos urgentes")]
    pub urgent: u32,
}

impl WeeklySummary {
    /// The week this summary reports on.
    pub fn week(&self) -> CalendarWeek {
        CalendarWeek::from_date(self.reported_on)
    }

    pub fn validate(&self) -> Result<(), SummaryError> {
        if !self.mean_length_of_stay.is_finite() || self.mean_length_of_stay < 0.0 {
            return Err(SummaryError::InvalidLengthOfStay(self.mean_length_of_stay));
        }
        if self.non_surgical + self.surgical == 0 {
            return Err(SummaryError::NoPatientTypes);
        }
        if self.non_urgent + self.urgent == 0 {
            return Err(SummaryError::NoAdmissionTypes);
        }
        Ok(())
    }

    /// Indicator shares of the reported week.
    ///
    /// Patient and admission counts become shares of their own totals. The
    /// season flag follows the month of `reported_on`. Call
    /// [`WeeklySummary::validate`] first; empty groups yield zero shares.
    pub fn indicators(&self) -> IndicatorVector {
        let share = |count: u32, total: u32| {
            if total == 0 {
                0.0
            } else {
                f64::from(count) / f64::from(total)
            }
        };
        let patients = self.non_surgical + self.surgical;
        let admissions = self.non_urgent + self.urgent;
        let season = Season::from_date(self.reported_on);

        let mut values = [0.0; Indicator::COUNT];
        for (slot, indicator) in values.iter_mut().zip(Indicator::ALL) {
            *slot = match indicator {
                Indicator::PatientNonSurgical => share(self.non_surgical, patients),
                Indicator::PatientSurgical => share(self.surgical, patients),
                Indicator::AdmissionNonUrgent => share(self.non_urgent, admissions),
                Indicator::AdmissionUrgent => share(self.urgent, admissions),
                Indicator::SeasonInvierno => flag(season == Season::Invierno),
                Indicator::SeasonOtono => flag(season == Season::Otono),
                Indicator::SeasonPrimavera => flag(season == Season::Primavera),
                Indicator::SeasonVerano => flag(season == Season::Verano),
            };
        }
        IndicatorVector::from_values(values)
    }
}

fn flag(set: bool) -> f64 {
    if set { 1.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> WeeklySummary {
        WeeklySummary {
            reported_on: NaiveDate::from_ymd_opt(2023, 7, 12).unwrap(),
            demand: 40,
            mean_length_of_stay: 4.5,
            non_surgical: 30,
            surgical: 10,
            non_urgent: 15,
            urgent: 25,
        }
    }

    #[test]
    fn indicators_are_shares_with_season_flag() {
        let indicators = summary().indicators();
        assert_eq!(indicators.get(Indicator::PatientNonSurgical), 0.75);
        assert_eq!(indicators.get(Indicator::PatientSurgical), 0.25);
        assert_eq!(indicators.get(Indicator::AdmissionNonUrgent), 0.375);
        assert_eq!(indicators.get(Indicator::AdmissionUrgent), 0.625);
        assert_eq!(indicators.get(Indicator::SeasonInvierno), 1.0);
        assert_eq!(indicators.get(Indicator::SeasonVerano), 0.0);
    }

    #[test]
    fn validation_rejects_empty_groups_and_bad_stays() {
        assert!(summary().validate().is_ok());

        let mut no_patients = summary();
        no_patients.non_surgical = 0;
        no_patients.surgical = 0;
        assert_eq!(no_patients.validate(), Err(SummaryError::NoPatientTypes));

        let mut no_admissions = summary();
        no_admissions.urgent = 0;
        no_admissions.non_urgent = 0;
        assert_eq!(no_admissions.validate(), Err(SummaryError::NoAdmissionTypes));

        let mut negative_stay = summary();
        negative_stay.mean_length_of_stay = -1.0;
        assert!(matches!(
            negative_stay.validate(),
            Err(SummaryError::InvalidLengthOfStay(_))
        ));
    }

    #[test]
    fn week_is_the_iso_week_of_the_report_date() {
        assert_eq!(summary().week().to_string(), "2023-28");
    }
}
