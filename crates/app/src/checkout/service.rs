//! Checkout coordinator.

use std::sync::Arc;

use async_trait::async_trait;
use driftworks::{
    cart::{Cart, CartError, LineUuid},
    catalog::{Catalog, ProductLookup, ProductUuid},
    checkout::{manual_order_token, validate_checkout},
};
use jiff::Timestamp;
use mockall::automock;
use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use tracing::{Span, info};

use crate::{
    checkout::{CheckoutError, CheckoutOutcome, CheckoutRequest, RequestedLine},
    domain::{
        catalog::CatalogService,
        checkouts::{PendingCheckoutsService, PendingCheckoutsServiceError},
        orders::{
            OrdersService, OrdersServiceError,
            data::{NewOrder, NewOrderItem},
            records::{CreatedOrder, OrderUuid},
        },
    },
    payments::{PaymentGateway, PaymentIntentRequest},
};

#[derive(Clone)]
pub struct CheckoutCoordinator {
    catalog: Arc<dyn CatalogService>,
    orders: Arc<dyn OrdersService>,
    pending: Arc<dyn PendingCheckoutsService>,
    payments: Arc<dyn PaymentGateway>,
    currency: &'static Currency,
}

impl CheckoutCoordinator {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogService>,
        orders: Arc<dyn OrdersService>,
        pending: Arc<dyn PendingCheckoutsService>,
        payments: Arc<dyn PaymentGateway>,
        currency: &'static Currency,
    ) -> Self {
        Self {
            catalog,
            orders,
            pending,
            payments,
            currency,
        }
    }

    /// Load the products behind `lines` and price the lines against them.
    async fn price(&self, lines: Vec<RequestedLine>) -> Result<(Cart, Catalog), CheckoutError> {
        let mut products: Vec<ProductUuid> = lines.iter().map(|line| line.product).collect();

        products.sort_unstable();
        products.dedup();

        let catalog = self.catalog.get_products(products).await?;

        let mut cart = Cart::new();

        for line in lines {
            let product = catalog
                .product(line.product)
                .ok_or(CartError::UnknownProduct(line.product))?;

            let selection = line
                .choice
                .into_selection(product)
                .map_err(CartError::from)?;

            cart.add_line(
                &catalog,
                LineUuid::new(),
                line.product,
                selection,
                line.quantity,
            )?;
        }

        Ok((cart, catalog))
    }
}

#[async_trait]
impl CheckoutService for CheckoutCoordinator {
    async fn quote(&self, lines: Vec<RequestedLine>) -> Result<Cart, CheckoutError> {
        let (cart, _catalog) = self.price(lines).await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "checkout.service.checkout",
        skip(self, request),
        fields(
            user_uuid = %request.user,
            lines = request.lines.len(),
            total = tracing::field::Empty,
            order_uuid = tracing::field::Empty
        ),
        err
    )]
    async fn checkout(&self, request: CheckoutRequest) -> Result<CheckoutOutcome, CheckoutError> {
        let CheckoutRequest {
            user,
            lines,
            contact,
            shipping,
        } = request;

        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let (cart, catalog) = self.price(lines).await?;

        let shipping = validate_checkout(&contact, shipping.as_ref(), cart.requires_shipping())?;

        let items = cart
            .lines()
            .iter()
            .map(|line| {
                catalog
                    .product(line.product())
                    .map(|product| NewOrderItem::snapshot(line, product))
                    .ok_or(CartError::UnknownProduct(line.product()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total = cart.subtotal();
        let order_uuid = OrderUuid::random();

        Span::current().record("total", total);
        Span::current().record("order_uuid", tracing::field::display(order_uuid));

        let mut order = NewOrder {
            uuid: order_uuid,
            user,
            total,
            contact,
            shipping,
            idempotency_token: String::new(),
            items,
        };

        if total == 0 {
            order.idempotency_token = manual_order_token(Timestamp::now(), user.into_uuid());

            let created = self.orders.create_order(order).await?;

            return Ok(CheckoutOutcome::Completed(created));
        }

        let mut metadata = FxHashMap::default();

        metadata.insert("order_uuid".to_string(), order_uuid.to_string());
        metadata.insert("user_uuid".to_string(), user.to_string());
        metadata.insert("email".to_string(), order.contact.email.clone());

        let intent = self
            .payments
            .create_payment_intent(PaymentIntentRequest {
                amount: total,
                currency: self.currency.iso_alpha_code.to_lowercase(),
                metadata,
            })
            .await?;

        order.idempotency_token.clone_from(&intent.payment_reference);

        self.pending
            .save_pending_checkout(intent.payment_reference.clone(), order)
            .await?;

        info!(payment_reference = %intent.payment_reference, "awaiting payment");

        Ok(CheckoutOutcome::PaymentRequired {
            client_secret: intent.client_secret,
            payment_reference: intent.payment_reference,
            total,
        })
    }

    #[tracing::instrument(
        name = "checkout.service.confirm_payment",
        skip(self),
        fields(payment_reference = %payment_reference),
        err
    )]
    async fn confirm_payment(&self, payment_reference: &str) -> Result<CreatedOrder, CheckoutError> {
        let pending = match self.pending.get_pending_checkout(payment_reference).await {
            Ok(pending) => pending,
            Err(PendingCheckoutsServiceError::NotFound) => {
                // The snapshot is consumed with the order, so a replay only
                // finds the order.
                let order = match self.orders.find_order_by_token(payment_reference).await {
                    Ok(order) => order,
                    Err(OrdersServiceError::NotFound) => {
                        return Err(CheckoutError::PendingCheckoutNotFound);
                    }
                    Err(error) => return Err(error.into()),
                };

                info!(order_uuid = %order.uuid, "payment already confirmed");

                return Ok(CreatedOrder {
                    order,
                    replayed: true,
                });
            }
            Err(error) => return Err(error.into()),
        };

        let created = self.orders.create_order(pending.order).await?;

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Price a client-held cart without placing anything.
    async fn quote(&self, lines: Vec<RequestedLine>) -> Result<Cart, CheckoutError>;

    /// Validate and price a cart, then reserve a payment for it or, when
    /// nothing is owed, create the order directly.
    async fn checkout(&self, request: CheckoutRequest) -> Result<CheckoutOutcome, CheckoutError>;

    /// Create the order parked under a confirmed payment. Repeated
    /// confirmations find the original order by its payment reference.
    async fn confirm_payment(&self, payment_reference: &str) -> Result<CreatedOrder, CheckoutError>;
}
