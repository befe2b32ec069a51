// ============================================================
// EXPORT RECORD
// ============================================================
// The fixed 15-column row consumed by the downstream spreadsheet.
// Field order below is the column order; no I/O here.

use serde::{Deserialize, Serialize};

use super::extraction::RawExtraction;

pub const EXPORT_HEADERS: [&str; 15] = [
    "요청 기관",
    "(외부)요청자",
    "접수번호/영장번호",
    "(내부)처리자",
    "분쟁 개입 여부",
    "민원인UID",
    "주문번호",
    "2차 민원시트",
    "2차 처리결과",
    "공문 처리결과",
    "처리결과 상세",
    "공문 발송여부",
    "정보 제공 여부",
    "이메일주소",
    "압수할 물건",
];

pub const POLICE_STATION_TOKEN: &str = "경찰서";

pub const DISPUTE_INVOLVEMENT: &str = "X";
pub const NOTICE_RESULT: &str = "완료";
pub const INFO_PROVIDED: &str = "O";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportRecord {
    #[serde(rename = "요청 기관")]
    pub requesting_org: String,
    #[serde(rename = "(외부)요청자")]
    pub requestor_name: String,
    #[serde(rename = "접수번호/영장번호")]
    pub warrant_number: String,
    #[serde(rename = "(내부)처리자")]
    pub internal_handler: String,
    #[serde(rename = "분쟁 개입 여부")]
    pub dispute_involvement: String,
    #[serde(rename = "민원인UID")]
    pub complainant_uid: String,
    #[serde(rename = "주문번호")]
    pub order_number: String,
    #[serde(rename = "2차 민원시트")]
    pub followup_sheet: String,
    #[serde(rename = "2차 처리결과")]
    pub followup_result: String,
    #[serde(rename = "공문 처리결과")]
    pub notice_result: String,
    #[serde(rename = "처리결과 상세")]
    pub result_detail: String,
    #[serde(rename = "공문 발송여부")]
    pub notice_sent: String,
    #[serde(rename = "정보 제공 여부")]
    pub info_provided: String,
    #[serde(rename = "이메일주소")]
    pub email: String,
    #[serde(rename = "압수할 물건")]
    pub items_to_seize: String,
}

impl ExportRecord {
    /// Values in column order.
    pub fn values(&self) -> [&str; 15] {
        [
            self.requesting_org.as_str(),
            self.requestor_name.as_str(),
            self.warrant_number.as_str(),
            self.internal_handler.as_str(),
            self.dispute_involvement.as_str(),
            self.complainant_uid.as_str(),
            self.order_number.as_str(),
            self.followup_sheet.as_str(),
            self.followup_result.as_str(),
            self.notice_result.as_str(),
            self.result_detail.as_str(),
            self.notice_sent.as_str(),
            self.info_provided.as_str(),
            self.email.as_str(),
            self.items_to_seize.as_str(),
        ]
    }

    /// `(header, value)` pairs in column order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> {
        EXPORT_HEADERS.into_iter().zip(self.values())
    }
}

pub fn map_to_export_record(raw: &RawExtraction) -> ExportRecord {
    ExportRecord {
        requesting_org: truncate_at_police_station(&raw.requesting_org).to_string(),
        requestor_name: raw.requestor_name.clone(),
        warrant_number: raw.warrant_number.clone(),
        internal_handler: String::new(),
        dispute_involvement: DISPUTE_INVOLVEMENT.to_string(),
        complainant_uid: String::new(),
        order_number: String::new(),
        followup_sheet: String::new(),
        followup_result: String::new(),
        notice_result: NOTICE_RESULT.to_string(),
        result_detail: String::new(),
        notice_sent: String::new(),
        info_provided: INFO_PROVIDED.to_string(),
        email: raw.email.clone(),
        items_to_seize: raw.items_to_seize.clone(),
    }
}

/// Cut everything after the first "경찰서", keeping the token itself.
pub fn truncate_at_police_station(org: &str) -> &str {
    match org.find(POLICE_STATION_TOKEN) {
        Some(pos) => &org[..pos + POLICE_STATION_TOKEN.len()],
        None => org,
    }
}
