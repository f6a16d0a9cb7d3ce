//! Data models module
//!
//! This module contains the request and response payloads exchanged with
//! the Event360 REST API

pub mod time;
pub mod user;
pub mod event;
pub mod order;
pub mod ticket;
pub mod admin;

// Re-export commonly used models
pub use user::{Role, User, AuthResponse, RegisterResponse, CurrentUserResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, UserMutationResponse, ChangePasswordRequest, Notification};
pub use event::{Event, EventStatus, EventDetails, TicketType, Review, ReviewRequest, CreateEventRequest, UpdateEventRequest, EventMutationResponse};
pub use order::{Order, OrderEventRef, OrderDetails, OrderItem, OrderItemRequest, CreateOrderRequest, CreateOrderResponse, Payment, PaymentRequest, PaymentResponse, Registration, RegistrationCreated, CreateRegistrationRequest, UserRef, WishlistItem};
pub use ticket::{Ticket, TicketEnvelope, TicketEventRef, TicketTypeRef, TicketStatus, CheckInResponse, TicketVerification};
pub use admin::{Statistics, UserStatistics, EventStatistics, OrderStatistics, ApprovalAction, ApproveEventRequest, UpdateRoleRequest, UpdateStatusRequest, FirstAdminRequest, MessageResponse, PendingEvent};
