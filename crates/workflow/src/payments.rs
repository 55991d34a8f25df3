//! Payment processing: internal simulated payments and gateway invoices.

use std::sync::Arc;

use async_trait::async_trait;
use common::OrderId;
use domain::{Money, Payment, PaymentMethod, PaymentStatus, external_ref, parse_external_ref};
use store::CafeStore;

use crate::error::WorkflowError;

/// External payment gateway collaborator.
///
/// The core only needs two facts from a gateway: an invoice redirect URL at
/// creation time, and (later, via callback) whether the invoice was paid.
/// Wire formats stay on the other side of this trait.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates an invoice and returns the URL to redirect the customer to.
    async fn create_invoice(
        &self,
        reference: &str,
        amount: Money,
        description: &str,
    ) -> Result<String, WorkflowError>;
}

/// Gateway stand-in that mints invoice URLs locally. Used in tests and when
/// no real gateway is configured.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    base_url: String,
}

impl SimulatedGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new("https://pay.invalid")
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn create_invoice(
        &self,
        reference: &str,
        _amount: Money,
        _description: &str,
    ) -> Result<String, WorkflowError> {
        Ok(format!("{}/invoice/{}", self.base_url, reference))
    }
}

/// A created gateway invoice.
#[derive(Debug, Clone)]
pub struct Invoice {
    /// Where to send the customer.
    pub url: String,
    /// External reference the gateway will echo back in its callback.
    pub reference: String,
}

/// Creates, links, and reconciles payments for orders.
pub struct PaymentProcessor<S, G> {
    store: Arc<S>,
    gateway: G,
}

impl<S: CafeStore, G: PaymentGateway> PaymentProcessor<S, G> {
    pub fn new(store: Arc<S>, gateway: G) -> Self {
        Self { store, gateway }
    }

    /// Records an internally processed (already collected) payment and links
    /// it to the order.
    #[tracing::instrument(skip(self))]
    pub async fn process_payment(
        &self,
        order_id: OrderId,
        amount: Money,
        method: PaymentMethod,
    ) -> Result<Payment, WorkflowError> {
        let mut order = self.store.get_order(order_id).await?;

        let payment = Payment::completed(order_id, amount, method);
        self.store.insert_payment(&payment).await?;

        order.attach_payment(payment.id);
        self.store.update_order(&order).await?;

        tracing::info!(order_id = %order_id, transaction = %payment.transaction_id, "payment recorded");
        Ok(payment)
    }

    /// Creates a gateway invoice for an order's total and records a pending
    /// payment awaiting the callback.
    #[tracing::instrument(skip(self))]
    pub async fn create_invoice(&self, order_id: OrderId) -> Result<Invoice, WorkflowError> {
        let mut order = self.store.get_order(order_id).await?;

        let reference = external_ref(order_id);
        let payment = Payment::pending(
            order_id,
            order.total(),
            PaymentMethod::EWallet,
            reference.clone(),
        );
        self.store.insert_payment(&payment).await?;

        order.attach_payment(payment.id);
        self.store.update_order(&order).await?;

        let description = format!("Payment for cafe order {order_id}");
        let url = self
            .gateway
            .create_invoice(&reference, payment.amount, &description)
            .await?;

        tracing::info!(order_id = %order_id, reference = %reference, "gateway invoice created");
        Ok(Invoice { url, reference })
    }

    /// Reconciles an asynchronous gateway callback with its order's payment.
    ///
    /// The order id is parsed back out of the external reference; the
    /// payment is marked completed on a `PAID`/`SETTLED` status and failed
    /// on anything else.
    #[tracing::instrument(skip(self))]
    pub async fn handle_callback(
        &self,
        reference: &str,
        gateway_status: &str,
    ) -> Result<Payment, WorkflowError> {
        let order_id = parse_external_ref(reference)?;
        let mut payment = self.store.payment_for_order(order_id).await?;

        payment.status = match gateway_status.to_ascii_uppercase().as_str() {
            "PAID" | "SETTLED" => PaymentStatus::Completed,
            _ => PaymentStatus::Failed,
        };
        self.store.update_payment(&payment).await?;

        tracing::info!(order_id = %order_id, status = ?payment.status, "gateway callback reconciled");
        Ok(payment)
    }

    /// Fetches the payment linked to an order.
    pub async fn payment_for_order(&self, order_id: OrderId) -> Result<Payment, WorkflowError> {
        Ok(self.store.payment_for_order(order_id).await?)
    }
}
