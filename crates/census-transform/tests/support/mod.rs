//! Synthetic admission workbooks for pipeline tests.

#![allow(dead_code)]

use chrono::{Days, NaiveDate};

use census_ingest::{
    ADMISSION_DATE_COLUMN, ADMISSION_TYPE_COLUMN, LENGTH_OF_STAY_COLUMN, LOOKUP_CATEGORY_COLUMN,
    LOOKUP_SERVICE_COLUMN, PATIENT_TYPE_COLUMN, RawDataset, SERVICE_CODE_COLUMN, Sheet,
};

/// Monday of ISO week 2021-01.
pub fn first_monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 4).unwrap()
}

/// One patient row.
pub struct Admission {
    pub service: String,
    pub date: String,
    pub stay: String,
    pub patient_type: &'static str,
    pub admission_type: &'static str,
}

impl Admission {
    pub fn on(service: &str, date: NaiveDate, index: usize) -> Self {
        Self {
            service: service.to_string(),
            date: format!("{} 08:30:00", date.format("%Y-%m-%d")),
            stay: format!("{}", 1 + index % 5),
            patient_type: if index % 2 == 0 { "Qx" } else { "No Qx" },
            admission_type: if index % 3 == 0 { "Urgente" } else { "No Urgente" },
        }
    }

    fn into_row(self) -> Vec<String> {
        vec![
            self.service,
            self.date,
            self.stay,
            self.patient_type.to_string(),
            self.admission_type.to_string(),
        ]
    }
}

/// `per_week` admissions to `service` in each week index produced by `weeks`.
pub fn weekly_admissions(
    service: &str,
    weeks: impl IntoIterator<Item = usize>,
    per_week: usize,
) -> Vec<Admission> {
    let mut rows = Vec::new();
    for week in weeks {
        let monday = first_monday() + Days::new(week as u64 * 7);
        for index in 0..per_week {
            let day = monday + Days::new((index % 7) as u64);
            rows.push(Admission::on(service, day, index));
        }
    }
    rows
}

pub fn patient_sheet(admissions: Vec<Admission>) -> Sheet {
    Sheet::new(
        "Pacientes",
        vec![
            SERVICE_CODE_COLUMN.to_string(),
            ADMISSION_DATE_COLUMN.to_string(),
            LENGTH_OF_STAY_COLUMN.to_string(),
            PATIENT_TYPE_COLUMN.to_string(),
            ADMISSION_TYPE_COLUMN.to_string(),
        ],
        admissions.into_iter().map(Admission::into_row).collect(),
    )
}

pub fn lookup_sheet(mappings: &[(&str, &str)]) -> Sheet {
    Sheet::new(
        "Servicios",
        vec![
            LOOKUP_SERVICE_COLUMN.to_string(),
            LOOKUP_CATEGORY_COLUMN.to_string(),
        ],
        mappings
            .iter()
            .map(|(code, category)| vec![(*code).to_string(), (*category).to_string()])
            .collect(),
    )
}

pub fn workbook(admissions: Vec<Admission>, mappings: &[(&str, &str)]) -> RawDataset {
    RawDataset::from_sheets(vec![
        patient_sheet(admissions),
        Sheet::new("Resumen", vec!["Nota".to_string()], vec![]),
        lookup_sheet(mappings),
    ])
}
