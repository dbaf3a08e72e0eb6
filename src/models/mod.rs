mod forms;
mod notification;
mod price_point;
mod product;
mod settings;
mod stats;
mod user;

pub use forms::{
    validate_email, FieldError, LoginForm, ProductEditForm, ProductForm, RegisterForm,
    ValidationErrors,
};
pub use notification::Notification;
pub use price_point::{HistorySource, PriceChange, PricePoint, PriceSeries, TimeRange};
pub use product::{
    CreateProductRequest, Product, ProductId, ProductStatus, UpdateProductRequest,
    PLACEHOLDER_IMAGE,
};
pub use settings::UserSettings;
pub use stats::DashboardStats;
pub use user::{AuthMessage, LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest, User};
