use crate::models::BusinessProfile;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Business profile as posted by the settings form. Absent fields clear
/// the stored value; this is a full overwrite, like invoice updates.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProfilePayload {
    #[validate(length(max = 256))]
    pub from_name: Option<String>,
    #[validate(email)]
    pub from_email: Option<String>,
    pub from_address: Option<String>,
    pub from_phone: Option<String>,
    pub from_mobile: Option<String>,
    pub from_fax: Option<String>,
    pub from_website: Option<String>,
    pub from_business_number: Option<String>,
    pub from_owner: Option<String>,
    #[validate(length(max = 16))]
    pub invoice_prefix: Option<String>,
    pub next_invoice_number: Option<i64>,
}

impl ProfilePayload {
    pub fn into_profile(self, user_id: &str, current: BusinessProfile) -> BusinessProfile {
        fn clean(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.trim().is_empty())
        }
        BusinessProfile {
            user_id: user_id.to_string(),
            from_name: clean(self.from_name),
            from_email: clean(self.from_email),
            from_address: clean(self.from_address),
            from_phone: clean(self.from_phone),
            from_mobile: clean(self.from_mobile),
            from_fax: clean(self.from_fax),
            from_website: clean(self.from_website),
            from_business_number: clean(self.from_business_number),
            from_owner: clean(self.from_owner),
            invoice_prefix: clean(self.invoice_prefix).unwrap_or(current.invoice_prefix),
            next_invoice_number: self
                .next_invoice_number
                .filter(|n| *n >= 1)
                .unwrap_or(current.next_invoice_number),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub from_name: Option<String>,
    pub from_email: Option<String>,
    pub from_address: Option<String>,
    pub from_phone: Option<String>,
    pub from_mobile: Option<String>,
    pub from_fax: Option<String>,
    pub from_website: Option<String>,
    pub from_business_number: Option<String>,
    pub from_owner: Option<String>,
    pub invoice_prefix: String,
    pub next_invoice_number: i64,
}

impl From<BusinessProfile> for ProfileResponse {
    fn from(profile: BusinessProfile) -> Self {
        Self {
            from_name: profile.from_name,
            from_email: profile.from_email,
            from_address: profile.from_address,
            from_phone: profile.from_phone,
            from_mobile: profile.from_mobile,
            from_fax: profile.from_fax,
            from_website: profile.from_website,
            from_business_number: profile.from_business_number,
            from_owner: profile.from_owner,
            invoice_prefix: profile.invoice_prefix,
            next_invoice_number: profile.next_invoice_number,
        }
    }
}
