//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `cart` - The persistent shopping cart and checkout
//! - `auth` - Login against an [`Authenticator`] and the stored session
//! - `contact` - Contact form validation and submission
//! - `reservation` - Table booking validation and submission
//! - `submit` - The [`Submitter`] seam and its simulated implementation
//! - `validation` - Field rules shared by the forms
//! - `notify` - Renderer and notifier seams to the presentation layer

pub mod auth;
pub mod cart;
pub mod contact;
pub mod notify;
pub mod reservation;
pub mod submit;
pub mod validation;

pub use auth::{
    AuthError, AuthenticatedUser, Authenticator, DemoAuthenticator, LoginForm, LoginOutcome,
    LoginRequest, LoginService,
};
pub use cart::{CartStore, CheckoutOutcome, PendingCheckout};
pub use contact::{ContactForm, ContactMessage, ContactService};
pub use notify::{CartRenderer, Notifier, TracingNotifier};
pub use reservation::{Reservation, ReservationForm, ReservationService};
pub use submit::{FormOutcome, SimulatedSubmitter, SubmitError, Submitter};
pub use validation::{FORM_ERRORS_MESSAGE, FieldError, FieldErrors, validate_fields};
