use serde::Deserialize;

/// 触发开通学生账号的事件
pub const SALE_PAID_TRIGGER: &str = "salePaid";
pub const PAID_STATUS: &str = "paid";

// Voomp 支付回调；只有客户信息与事件状态参与处理，其余字段按原样接收
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoompWebhookPayload {
    pub sale: VoompSale,
    #[serde(rename = "type", default)]
    pub event_type: String,
    pub client: VoompClient,
    pub product: VoompProduct,
    pub trigger: String,
    #[serde(default)]
    pub old_status: String,
    #[serde(default)]
    pub sale_metas: Vec<serde_json::Value>,
    #[serde(default)]
    pub product_metas: serde_json::Map<String, serde_json::Value>,
    pub current_status: String,
    #[serde(default)]
    pub proposal_metas: Vec<serde_json::Value>,
}

impl VoompWebhookPayload {
    /// 仅已确认付款的销售事件需要开通账号
    pub fn is_confirmed_payment(&self) -> bool {
        self.trigger == SALE_PAID_TRIGGER && self.current_status == PAID_STATUS
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VoompSale {
    pub id: i64,
    pub amount: f64,
    pub method: String,
    pub status: String,
    #[serde(default)]
    pub smart_sale: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VoompClient {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub cellphone: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VoompProduct {
    pub id: i64,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_accepts_voomp_field_names() {
        let payload: VoompWebhookPayload = serde_json::from_value(serde_json::json!({
            "sale": {"id": 91, "amount": 197.0, "method": "pix", "status": "paid", "smart_sale": 0},
            "type": "sale",
            "client": {
                "id": 7, "city": "Recife", "name": "Maria Luíza",
                "email": "maria@example.com", "street": "Rua A", "cellphone": "81999990000"
            },
            "product": {"id": 3, "name": "Trilha Backend"},
            "trigger": "salePaid",
            "oldStatus": "waiting_payment",
            "saleMetas": [],
            "productMetas": {"cohort": "2025-1"},
            "currentStatus": "paid",
            "proposalMetas": []
        }))
        .unwrap();

        assert!(payload.is_confirmed_payment());
        assert_eq!(payload.event_type, "sale");
        assert_eq!(payload.old_status, "waiting_payment");
        assert_eq!(payload.client.cellphone, "81999990000");
        assert_eq!(payload.product_metas["cohort"], "2025-1");
    }

    #[test]
    fn test_refund_is_not_a_confirmed_payment() {
        let payload: VoompWebhookPayload = serde_json::from_value(serde_json::json!({
            "sale": {"id": 91, "amount": 197.0, "method": "pix", "status": "refunded"},
            "client": {"id": 7, "name": "Maria", "email": "maria@example.com"},
            "product": {"id": 3, "name": "Trilha Backend"},
            "trigger": "saleRefunded",
            "currentStatus": "refunded"
        }))
        .unwrap();

        assert!(!payload.is_confirmed_payment());
    }
}
