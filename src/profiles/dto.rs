use serde::Deserialize;

fn default_primary_color() -> String {
    "#3B82F6".to_string()
}

fn default_secondary_color() -> String {
    "#8B5CF6".to_string()
}

/// Request body for profile creation. Colors fall back to the product's
/// default palette when omitted.
#[derive(Debug, Deserialize)]
pub struct ProfileCreate {
    pub name: String,
    pub job: String,
    pub phone: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub whatsapp: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub tiktok: Option<String>,
    pub youtube: Option<String>,
    pub photo_url: Option<String>,
    pub cover_url: Option<String>,
    pub design_type: Option<String>,
    #[serde(default = "default_primary_color")]
    pub primary_color: String,
    #[serde(default = "default_secondary_color")]
    pub secondary_color: String,
}

/// Partial update: only fields present in the body are written.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub job: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub whatsapp: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub tiktok: Option<String>,
    pub youtube: Option<String>,
    pub photo_url: Option<String>,
    pub cover_url: Option<String>,
    pub design_type: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.job.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.company.is_none()
            && self.whatsapp.is_none()
            && self.website.is_none()
            && self.address.is_none()
            && self.instagram.is_none()
            && self.facebook.is_none()
            && self.linkedin.is_none()
            && self.tiktok.is_none()
            && self.youtube.is_none()
            && self.photo_url.is_none()
            && self.cover_url.is_none()
            && self.design_type.is_none()
            && self.primary_color.is_none()
            && self.secondary_color.is_none()
    }
}

/// Query parameters for the owner-scoped listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileFilter {
    All,
    Archived,
    Expiring,
}

impl ProfileFilter {
    /// Unknown filter values fall back to the unfiltered listing.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("archived") => ProfileFilter::Archived,
            Some("expiring") => ProfileFilter::Expiring,
            _ => ProfileFilter::All,
        }
    }
}
