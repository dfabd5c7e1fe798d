//! Public views of request records
//!
//! The representation handed to callers for each request in a page.

use crate::assembler::RecordMapper;
use crate::links::UriContext;
use crate::types::{RecordId, RequestRecord, RequestState, RequestType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public representation of a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestInfo {
    pub request_id: RecordId,
    pub request_type: RequestType,
    pub request_status: RequestState,
    /// Absolute URL of the request resource
    pub request_url: String,
    pub created_at: DateTime<Utc>,
}

/// Maps request records to [`RequestInfo`]
///
/// The request URL is the listing path with the request id appended.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestInfoMapper;

impl RecordMapper<RequestRecord> for RequestInfoMapper {
    type View = RequestInfo;

    fn map(&self, record: &RequestRecord, context: &UriContext) -> RequestInfo {
        RequestInfo {
            request_id: record.id,
            request_type: record.kind,
            request_status: record.state,
            request_url: request_url(context, record.id),
            created_at: record.created_at,
        }
    }
}

fn request_url(context: &UriContext, id: RecordId) -> String {
    let mut url = context.base().clone();
    match url.path_segments_mut() {
        Ok(mut segments) => {
            segments.pop_if_empty().push(&id.to_string());
        }
        Err(()) => return format!("{}/{id}", context.base().as_str().trim_end_matches('/')),
    }
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_maps_record_fields() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let record = RequestRecord::new(42, RequestState::Complete, RequestType::Enrollment)
            .with_created_at(created);
        let ctx = UriContext::parse("https://pki.example.com/ca/rest/requests?start=3").unwrap();

        let info = RequestInfoMapper.map(&record, &ctx);

        assert_eq!(info.request_id, RecordId(42));
        assert_eq!(info.request_type, RequestType::Enrollment);
        assert_eq!(info.request_status, RequestState::Complete);
        assert_eq!(info.request_url, "https://pki.example.com/ca/rest/requests/42");
        assert_eq!(info.created_at, created);
    }

    #[test]
    fn test_trailing_slash_base() {
        let record = RequestRecord::new(7, RequestState::Pending, RequestType::Recovery);
        let ctx = UriContext::parse("https://pki.example.com/kra/rest/requests/").unwrap();

        let info = RequestInfoMapper.map(&record, &ctx);
        assert_eq!(info.request_url, "https://pki.example.com/kra/rest/requests/7");
    }

    #[test]
    fn test_serializes_camel_case() {
        let created = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let info = RequestInfo {
            request_id: RecordId(3),
            request_type: RequestType::Recovery,
            request_status: RequestState::Rejected,
            request_url: "https://h/r/3".to_string(),
            created_at: created,
        };

        assert_eq!(
            serde_json::to_value(&info).unwrap(),
            json!({
                "requestId": 3,
                "requestType": "recovery",
                "requestStatus": "rejected",
                "requestUrl": "https://h/r/3",
                "createdAt": "2024-01-02T03:04:05Z"
            })
        );
    }
}
