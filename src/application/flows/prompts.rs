//! User-facing text of the facility flows.

pub const DID_NOT_UNDERSTAND: &str =
    "Sorry did I not understand. I think i am running out of my bot super powers!";
pub const ANYTHING_ELSE: &str = "Is there anything else i can help you with";
pub const ANYTHING_ELSE_AFTER_DECLINE: &str = "Is there anything else i can help you with ?";

pub const ASK_FACILITY_TYPE: &str = "Which facility would you like to book?";
pub const ASK_EMPLOYEE_ID: &str = "Can I have your Employee ID please?";
pub const ASK_DATE: &str = "For which date would you like to book?";
pub const ASK_FLOOR: &str = "On which floor would you like to book?";
pub const EMPLOYEE_ID_INCORRECT: &str = "The Employee ID provided is incorrect";
pub const OFFICE_SPACE_RESTRICTED: &str =
    "Sorry office space is only for Senior Executives. Would you like to book an office cubicle instead?";

pub const ASK_DESTINATION: &str = "Where do you wish to be navigated?";

pub const YES_NO: &str = "Yes/No";

pub fn date_unavailable(facility_type: &str) -> String {
    format!(
        "No {} is available on this date, would you like to book for another date?",
        facility_type
    )
}

pub fn floor_unavailable(facility_type: &str) -> String {
    format!(
        "No {} is available on this floor, would you like to book for another floor?",
        facility_type
    )
}

pub fn location_of(facility_id: &str) -> String {
    format!("{} is located on 2nd floor Wing A", facility_id)
}
