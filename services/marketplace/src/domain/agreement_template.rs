//! Fixed rent-agreement template.
//!
//! The document is rebuilt from the stored form on every download. Form values are
//! interpolated verbatim; only the term end date and the month conversions of the
//! lock-in and notice periods are derived.

use roofline_domain::agreement::{
    DATE_FORMAT, agreement_end_date, days_to_months, parse_date,
};

use crate::domain::types::RentAgreement;

pub const AGREEMENT_TITLE: &str = "RENTAL AGREEMENT";

/// Render-ready text of one agreement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgreementDocument {
    pub title: String,
    pub parties: Vec<String>,
    pub clauses: Vec<String>,
    pub signatures: Vec<String>,
}

impl AgreementDocument {
    /// File name offered in `Content-Disposition`.
    pub fn file_name(agreement: &RentAgreement) -> String {
        format!("rent-agreement-{}.pdf", agreement.id)
    }
}

fn term_end(agreement: &RentAgreement) -> Option<String> {
    let start = parse_date(&agreement.rent_start_date)?;
    let months: u32 = agreement.agreement_duration.trim().parse().ok()?;
    agreement_end_date(start, months).map(|end| end.format(DATE_FORMAT).to_string())
}

fn days_as_months(days: &str) -> String {
    match days.trim().parse::<u32>() {
        Ok(days) => days_to_months(days).to_string(),
        Err(_) => days.to_owned(),
    }
}

pub fn build_document(agreement: &RentAgreement) -> AgreementDocument {
    let a = agreement;
    let end = term_end(a).unwrap_or_else(|| "the end of the agreed term".to_owned());
    let lock_in_months = days_as_months(&a.lock_in_period);
    let notice_months = days_as_months(&a.notice_period);
    let maintenance = match a.maintenance.as_deref() {
        Some(m) if !m.trim().is_empty() => {
            format!("The Tenant shall pay a monthly maintenance charge of Rs. {m} along with the rent.")
        }
        _ => "Maintenance charges, if any, are included in the monthly rent.".to_owned(),
    };

    let clauses = vec![
        format!(
            "The term of this agreement is {} months commencing from {} and ending on {}.",
            a.agreement_duration.trim(),
            a.rent_start_date.trim(),
            end
        ),
        format!(
            "The Tenant shall pay a monthly rent of Rs. {} on or before day {} of every month.",
            a.rent_amount, a.rent_due_day
        ),
        format!(
            "The Tenant has paid an interest-free security deposit of Rs. {}, refundable at the end of the tenancy after adjusting any dues or damages.",
            a.security_deposit
        ),
        maintenance,
        format!(
            "The agreement carries a lock-in period of {lock_in_months} month(s), during which neither party may terminate it except for breach."
        ),
        format!(
            "After the lock-in period either party may terminate this agreement by giving {notice_months} month(s) written notice."
        ),
        "The premises shall be used for residential purposes only.".to_owned(),
        "The Tenant shall not sublet, assign or part with possession of the premises without the Owner's written consent.".to_owned(),
        "Electricity, water and gas charges as per actual consumption shall be paid by the Tenant directly to the authorities concerned.".to_owned(),
        "The Tenant shall keep the premises clean and in good condition, subject to normal wear and tear.".to_owned(),
        "Minor day-to-day repairs shall be borne by the Tenant; structural and major repairs shall be borne by the Owner.".to_owned(),
        "The Tenant shall not make any structural alteration to the premises without the Owner's written consent.".to_owned(),
        "The Owner or an authorised person may inspect the premises at a reasonable time after giving prior notice.".to_owned(),
        "The Tenant shall comply with the rules of the housing society or building association.".to_owned(),
        "The Tenant shall not store hazardous, illegal or inflammable material on the premises.".to_owned(),
        "Any damage to the premises caused by the Tenant beyond normal wear and tear shall be made good by the Tenant.".to_owned(),
        "Delay in payment of rent beyond fifteen days from the due date shall be treated as a breach of this agreement.".to_owned(),
        "On termination the Tenant shall hand over vacant and peaceful possession of the premises together with all keys.".to_owned(),
        "The security deposit shall be refunded at the time of handing over possession, after deducting lawful dues.".to_owned(),
        "Any renewal of this agreement shall be on mutually agreed terms recorded in writing.".to_owned(),
        "Stamp duty and registration charges, if applicable, shall be shared equally by both parties.".to_owned(),
        "Disputes arising out of this agreement shall be subject to the jurisdiction of the courts where the premises are situated.".to_owned(),
    ];

    AgreementDocument {
        title: AGREEMENT_TITLE.to_owned(),
        parties: vec![
            format!(
                "This agreement is made between {} (phone {}), residing at {}, hereinafter the Owner,",
                a.owner_name, a.owner_phone, a.owner_address
            ),
            format!(
                "and {} (phone {}), residing at {}, hereinafter the Tenant,",
                a.tenant_name, a.tenant_phone, a.tenant_address
            ),
            format!("for the premises situated at {}.", a.property_address),
        ],
        clauses,
        signatures: vec![
            format!("Owner: {}", a.owner_name),
            format!("Tenant: {}", a.tenant_name),
            "Witness 1:".to_owned(),
            "Witness 2:".to_owned(),
        ],
    }
}
