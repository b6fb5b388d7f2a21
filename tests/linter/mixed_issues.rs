/// wire::controller -Middleware=Auht
pub struct Orders;

impl Orders {
    /// wire::route GET /orders/{id:OrderId}
    #[allow(non_snake_case)]
    pub fn getOrder(&self, id: OrderId) {}
}

/// wire::controller
pub struct Empty;

/// wire::middleware Auth -Priority=5
pub struct AuthLayer;

impl AuthLayer {
    pub fn handle(&self) {}
}

/// wire::core -Mode=Transient
pub struct Mailer;

/// wire::core
pub struct Signup {
    /// wire::inject
    mailer: Mailer,
}
