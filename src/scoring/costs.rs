use crate::options::StudyOption;

/// Horizon used by the comparison views' "six-month" projection.
pub const DEFAULT_PROJECTION_MONTHS: u32 = 6;

/// Sum of the nine recurring line items minus the scholarship.
/// Negative when the scholarship covers more than the costs.
pub fn monthly_total(option: &StudyOption) -> f64 {
    option.monthly_rent
        + option.monthly_food
        + option.monthly_transport
        + option.monthly_phone
        + option.monthly_academic
        + option.monthly_leisure
        + option.monthly_travel
        + option.monthly_health
        + option.monthly_misc
        - option.scholarship
}

/// Sum of the five arrival costs.
pub fn one_time_total(option: &StudyOption) -> f64 {
    option.flight_cost
        + option.visa_cost
        + option.housing_deposit
        + option.setup_cost
        + option.insurance_cost
}

pub fn multi_month_total(option: &StudyOption, months: u32) -> f64 {
    monthly_total(option) * months as f64 + one_time_total(option)
}

pub fn six_month_total(option: &StudyOption) -> f64 {
    multi_month_total(option, DEFAULT_PROJECTION_MONTHS)
}
