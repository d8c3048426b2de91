/// Listing normalization
///
/// Extracts the canonical location record from the deeply nested listing
/// payload. The category id is derived from the primary category's resource
/// name; a listing whose category name lacks the exact provider prefix fails
/// normalization.
use crate::{
    error::{DeskError, DeskResult},
    providers::listing::LocationPayload,
};

pub const CATEGORY_ID_PREFIX: &str = "categories/gcid:";
const SERVICE_ID_PREFIX: &str = "job_type_id:";

/// Canonical service offering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedService {
    pub service_id: String,
    pub name: String,
}

/// Canonical listing record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedListing {
    pub location_id: String,
    pub title: String,
    pub category_id: String,
    pub category_name: String,
    pub services: Vec<NormalizedService>,
}

/// Strip the fixed provider prefix off a category resource name
pub fn extract_category_id(resource_name: &str) -> DeskResult<String> {
    resource_name
        .strip_prefix(CATEGORY_ID_PREFIX)
        .map(str::to_string)
        .ok_or_else(|| {
            DeskError::Parse(format!(
                "category resource name {:?} lacks the {:?} prefix",
                resource_name, CATEGORY_ID_PREFIX
            ))
        })
}

/// Map a nested listing payload to the canonical record
pub fn normalize_listing(payload: &LocationPayload) -> DeskResult<NormalizedListing> {
    // Location id is the last segment of the resource name
    let location_id = payload
        .name
        .split('/')
        .last()
        .unwrap_or(&payload.name)
        .to_string();
    if location_id.is_empty() {
        return Err(DeskError::Parse(
            "listing has an empty location id".to_string(),
        ));
    }

    let primary = &payload.categories.primary_category;
    let category_id = extract_category_id(&primary.name)?;

    let services = primary
        .service_types
        .iter()
        .map(|service| NormalizedService {
            // Service ids are stripped leniently, unlike the category prefix
            service_id: service
                .service_type_id
                .trim_start_matches(SERVICE_ID_PREFIX)
                .to_string(),
            name: service.display_name.clone(),
        })
        .collect();

    Ok(NormalizedListing {
        location_id,
        title: payload.title.clone(),
        category_id,
        category_name: primary.display_name.clone(),
        services,
    })
}
