//! RecordDamage action
//!
//! Damage found in the store: available stock is written off as damaged.
//! Damage caused by a post-print cancellation is recorded by the
//! cancellation itself.

use async_trait::async_trait;

use crate::db::repository::{RepoError, damage};
use crate::fulfillment::error::FulfillmentResult;
use crate::fulfillment::{WorkflowAction, ledger};
use crate::utils::validation::{
    MAX_NOTE_LEN, validate_optional_text, validate_quantity, validate_required_text,
};
use shared::models::{Actor, Capability, StockDamage, StockDamageCreate};
use sqlx::SqliteConnection;

#[derive(Debug, Clone)]
pub struct RecordDamageAction {
    pub data: StockDamageCreate,
}

#[async_trait]
impl WorkflowAction for RecordDamageAction {
    type Output = StockDamage;
    const NAME: &'static str = "record_damage";
    const CAPABILITY: Capability = Capability::ReceiveStock;

    async fn execute(
        &self,
        conn: &mut SqliteConnection,
        actor: &Actor,
    ) -> FulfillmentResult<StockDamage> {
        validate_quantity(self.data.quantity, "quantity")?;
        validate_required_text(&self.data.reason, "reason", MAX_NOTE_LEN)?;
        validate_optional_text(&self.data.notes, "notes", MAX_NOTE_LEN)?;

        ledger::write_off(conn, self.data.product_id, self.data.quantity).await?;

        let damage_id = damage::insert(
            &mut *conn,
            self.data.product_id,
            self.data.order_id,
            self.data.quantity,
            self.data.reason.trim(),
            actor.user_id,
            self.data.notes.as_deref(),
        )
        .await?;

        tracing::info!(
            damage_id,
            product_id = self.data.product_id,
            quantity = self.data.quantity,
            "Stock damage recorded"
        );

        Ok(damage::find_by_id(&mut *conn, damage_id)
            .await?
            .ok_or_else(|| RepoError::Database(format!("Failed to read back damage {damage_id}")))?)
    }
}
