use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::serde_helpers::{self, lenient_f64, lenient_f64_opt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryStatus {
    Generated,
    Paid,
    Pending,
}

impl SalaryStatus {
    pub fn label(self) -> &'static str {
        match self {
            SalaryStatus::Generated => "Generated",
            SalaryStatus::Paid => "Paid",
            SalaryStatus::Pending => "Pending",
        }
    }
}

/// One month's payslip. All amounts are computed server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalarySlip {
    pub id: i64,
    pub month_year: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub basic_salary: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub total_earnings: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub total_deductions: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub net_salary: f64,
    pub status: SalaryStatus,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default, with = "serde_helpers::timestamp_opt")]
    pub created_at: Option<OffsetDateTime>,
}

/// Year-to-date totals as reported by `/salary/ytd`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct YtdEarnings {
    pub year: Option<i32>,
    #[serde(deserialize_with = "lenient_f64_opt")]
    pub total_earnings: Option<f64>,
    #[serde(deserialize_with = "lenient_f64_opt")]
    pub total_deductions: Option<f64>,
    #[serde(deserialize_with = "lenient_f64_opt")]
    pub total_net: Option<f64>,
    pub months: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Earning,
    Deduction,
}

/// One line of a payslip breakdown, e.g. "Provident Fund".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryComponent {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub component_id: Option<i64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    #[serde(default)]
    pub component_name: Option<String>,
    #[serde(default)]
    pub component_type: Option<String>,
}

impl SalaryComponent {
    pub fn name(&self) -> &str {
        self.component_name.as_deref().unwrap_or("Unnamed component")
    }
}

/// A payslip with its component lines, from `/salary/{id}`.
#[derive(Debug, Clone, PartialEq)]
pub struct SalarySlipDetail {
    pub salary: SalarySlip,
    pub components: Vec<SalaryComponent>,
}

impl SalarySlipDetail {
    pub fn earnings(&self) -> impl Iterator<Item = &SalaryComponent> {
        self.components
            .iter()
            .filter(|c| c.kind == ComponentKind::Earning)
    }

    pub fn deductions(&self) -> impl Iterator<Item = &SalaryComponent> {
        self.components
            .iter()
            .filter(|c| c.kind == ComponentKind::Deduction)
    }
}

/// `1234567.5` -> `1,234,567.50`
pub fn format_amount(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!(
        "{}{}.{:02}",
        if negative { "-" } else { "" },
        grouped,
        cents % 100
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_amounts_with_thousand_separators() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(999.5), "999.50");
        assert_eq!(format_amount(1234567.5), "1,234,567.50");
        assert_eq!(format_amount(-1200.0), "-1,200.00");
    }

    #[test]
    fn slip_accepts_string_amounts() {
        let raw = r#"{
            "id": 4, "month_year": "2024-05", "basic_salary": "50000.00",
            "total_earnings": 62000, "total_deductions": "4500.5",
            "net_salary": "57499.50", "status": "paid"
        }"#;
        let slip: SalarySlip = serde_json::from_str(raw).unwrap();
        assert_eq!(slip.basic_salary, 50000.0);
        assert_eq!(slip.total_deductions, 4500.5);
        assert_eq!(slip.status, SalaryStatus::Paid);
    }

    #[test]
    fn components_split_by_kind() {
        let raw = r#"[
            {"id": 1, "component_id": 3, "amount": "4200.00", "type": "earning", "component_name": "Basic Salary"},
            {"id": 2, "component_id": 7, "amount": 336, "type": "deduction", "component_name": "Provident Fund"},
            {"id": 3, "component_id": 8, "amount": 120.5, "type": "earning"}
        ]"#;
        let components: Vec<SalaryComponent> = serde_json::from_str(raw).unwrap();
        let slip: SalarySlip = serde_json::from_str(
            r#"{"id": 9, "month_year": "2024-05", "basic_salary": 4200, "total_earnings": 4320.5,
                "total_deductions": 336, "net_salary": 3984.5, "status": "generated"}"#,
        )
        .unwrap();
        let detail = SalarySlipDetail {
            salary: slip,
            components,
        };

        let earnings: Vec<_> = detail.earnings().map(|c| c.name()).collect();
        assert_eq!(earnings, vec!["Basic Salary", "Unnamed component"]);
        let deductions: Vec<_> = detail.deductions().map(|c| c.amount).collect();
        assert_eq!(deductions, vec![336.0]);
    }

    #[test]
    fn ytd_tolerates_missing_fields() {
        let ytd: YtdEarnings = serde_json::from_str(r#"{"year": 2024, "total_net": "1000"}"#).unwrap();
        assert_eq!(ytd.year, Some(2024));
        assert_eq!(ytd.total_net, Some(1000.0));
        assert_eq!(ytd.total_earnings, None);
    }
}
