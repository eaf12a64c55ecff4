use domain::PublicEvent;
use serde::Serialize;

/// 活动列表中的单条记录
///
/// 公开描述在 JSON 中固定使用 `desc` 字段名。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventSummaryDto {
    pub id: i64,
    pub title: String,
    pub host: String,
    #[serde(rename = "desc")]
    pub public_description: String,
}

impl From<PublicEvent> for EventSummaryDto {
    fn from(event: PublicEvent) -> Self {
        Self {
            id: event.id.value(),
            title: event.title,
            host: event.host,
            public_description: event.public_description,
        }
    }
}
