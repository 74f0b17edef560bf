//! Mapping from operation failures to user-facing notifications.

use crate::config::Messages;
use crate::error::CartError;
use crate::ports::NotificationSink;

/// The three cart mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `add_product`
    Add,
    /// `remove_product`
    Remove,
    /// `update_product_amount`
    UpdateAmount,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Remove => "remove",
            Operation::UpdateAmount => "update_amount",
        }
    }
}

/// Decides which failures reach the user, and with which text.
///
/// | failure                    | add      | remove   | update   |
/// |----------------------------|----------|----------|----------|
/// | stock exceeded             | stock    | stock    | stock    |
/// | invalid quantity           | silent   | silent   | silent   |
/// | item not in cart           | add      | remove   | silent   |
/// | not found / network / else | add      | remove   | update   |
#[derive(Debug, Clone, Default)]
pub struct NotificationPolicy {
    messages: Messages,
}

impl NotificationPolicy {
    pub fn new(messages: Messages) -> Self {
        Self { messages }
    }

    /// The message to show for `error` raised by `op`, or `None` to stay silent.
    pub fn message_for(&self, op: Operation, error: &CartError) -> Option<&str> {
        let message = match (op, error) {
            (_, CartError::InvalidQuantity(_)) => return None,
            (Operation::UpdateAmount, CartError::ItemNotInCart(_)) => return None,
            (_, CartError::StockExceeded { .. }) => &self.messages.out_of_stock,
            (Operation::Add, _) => &self.messages.add_failed,
            (Operation::Remove, _) => &self.messages.remove_failed,
            (Operation::UpdateAmount, _) => &self.messages.update_failed,
        };
        Some(message.as_str())
    }
}

/// Sink that turns notifications into `warn` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, message: &str) {
        tracing::warn!(target: "cart::notify", "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ProductId;

    const ID: ProductId = ProductId::new(1);

    fn stock_exceeded() -> CartError {
        CartError::StockExceeded {
            product_id: ID,
            requested: 6,
            available: 5,
        }
    }

    #[test]
    fn test_stock_exceeded_always_reported() {
        let policy = NotificationPolicy::default();
        for op in [Operation::Add, Operation::Remove, Operation::UpdateAmount] {
            assert_eq!(
                policy.message_for(op, &stock_exceeded()),
                Some("Requested quantity is out of stock")
            );
        }
    }

    #[test]
    fn test_silent_failures() {
        let policy = NotificationPolicy::default();
        assert_eq!(
            policy.message_for(Operation::UpdateAmount, &CartError::InvalidQuantity(0)),
            None
        );
        assert_eq!(
            policy.message_for(Operation::UpdateAmount, &CartError::ItemNotInCart(ID)),
            None
        );
    }

    #[test]
    fn test_generic_messages_per_operation() {
        let policy = NotificationPolicy::default();
        let network = CartError::Network("connection refused".into());

        assert_eq!(
            policy.message_for(Operation::Add, &CartError::NotFound(ID)),
            Some("Could not add product")
        );
        assert_eq!(
            policy.message_for(Operation::Remove, &CartError::ItemNotInCart(ID)),
            Some("Could not remove product")
        );
        assert_eq!(
            policy.message_for(Operation::UpdateAmount, &network),
            Some("Could not change product quantity")
        );
    }

    #[test]
    fn test_custom_messages() {
        let messages = Messages {
            out_of_stock: "Sold out".into(),
            ..Messages::default()
        };
        let policy = NotificationPolicy::new(messages);
        assert_eq!(policy.message_for(Operation::Add, &stock_exceeded()), Some("Sold out"));
    }
}
