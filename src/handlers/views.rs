//! Page rendering
//!
//! Pure functions turning API payloads into message text and inline
//! keyboards. Handlers fetch, views render.

use chrono::{DateTime, Utc};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use crate::forms::MAX_IMAGE_BYTES;
use crate::listing::{page_window, FilterKey, ListingState, Page};
use crate::middleware::Access;
use crate::models::{
    ApprovalAction, CheckInResponse, CreateEventRequest, CreateOrderResponse, Event, EventDetails, Notification,
    Order, OrderDetails, PaymentResponse, PendingEvent, Role, Statistics, Ticket, TicketVerification, User,
    WishlistItem,
};
use crate::state::Session;
use crate::utils::helpers::{capitalize, create_pagination_info, format_event_date, format_price, format_timestamp, truncate_text};
use super::callbacks::{AdminSection, CallbackAction};

fn button(text: impl Into<String>, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text.into(), action.to_string())
}

pub fn welcome(featured: &[Event], session: Option<&Session>) -> String {
    let mut text = match session {
        Some(session) => format!("👋 Welcome back, {}!\n\n", session.user.username),
        None => "👋 Welcome to Event360!\nDiscover events, buy tickets and manage your bookings.\n\n".to_string(),
    };

    if featured.is_empty() {
        text.push_str("No upcoming events yet. Check back soon!");
    } else {
        text.push_str("✨ Upcoming events\n");
        for event in featured {
            text.push_str(&format!(
                "\n• {}\n  📅 {}\n  📍 {}\n  💰 {}\n",
                event.title,
                format_event_date(event.start_time),
                event.location(),
                format_price(event.price)
            ));
        }
    }

    text.push_str("\nBrowse everything with /events");
    if session.is_none() {
        text.push_str(", or /login and /register to buy tickets.");
    }
    text
}

pub fn welcome_keyboard(featured: &[Event]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = featured
        .iter()
        .map(|event| vec![button(truncate_text(&event.title, 40), CallbackAction::Event(event.id))])
        .collect();
    rows.push(vec![button("🔎 Browse all events", CallbackAction::Page(1))]);
    InlineKeyboardMarkup::new(rows)
}

pub fn help(session: Option<&Session>) -> String {
    let mut text = String::from(
        "Event360 commands\n\n\
         /events [search] - browse events\n\
         /event <id> - event details\n\
         /login - sign in\n\
         /register - create an account\n\
         /cancel - abandon the current form\n",
    );

    if let Some(session) = session {
        text.push_str(
            "\n/me - your profile\n\
             /dashboard - your overview\n\
             /tickets - your tickets\n\
             /orders - your orders\n\
             /buy <ticket type id> [quantity] - buy tickets\n\
             /wishlist - saved events\n\
             /notifications - your notifications\n\
             /password - change your password\n\
             /logout - sign out\n",
        );
        if session.is_organizer() {
            text.push_str(
                "\n/createevent - submit an event for approval\n\
                 /myevents - events you organize\n\
                 /checkin <ticket id> - check a ticket in\n\
                 /verify <code> - verify a ticket code\n",
            );
        }
        if session.is_admin() {
            text.push_str("\n/admin - admin panel\n/stats - platform statistics\n");
        }
    }
    text
}

/// Text for a guard refusal
pub fn access_denied(access: &Access) -> String {
    match access {
        Access::Granted => String::new(),
        Access::RedirectToLogin => "🔐 Please /login to continue.".to_string(),
        Access::Denied { role, required } => {
            let required: Vec<&str> = required.iter().map(Role::label).collect();
            format!(
                "⛔ You don't have permission to access this page.\nYour role: {}. Required: {}.",
                role.label(),
                required.join(" or ")
            )
        }
    }
}

pub fn event_list(page: &Page<Event>, state: &ListingState) -> String {
    let mut text = String::from("🎫 Events\n");

    let filters = &state.filters;
    let mut active = Vec::new();
    for key in [FilterKey::Category, FilterKey::City, FilterKey::Search, FilterKey::Status] {
        if let Some(value) = filters.get(key) {
            active.push(format!("{}: {}", capitalize(key.as_str()), value));
        }
    }
    if !active.is_empty() {
        text.push_str(&format!("Filters: {}\n", active.join(" · ")));
    }

    if page.is_empty() {
        text.push_str("\nNo events found.");
        if !filters.is_empty() {
            text.push_str(" Try clearing the filters.");
        }
        return text;
    }

    let offset = page.offset();
    for (i, event) in page.items.iter().enumerate() {
        text.push_str(&format!(
            "\n{}. {}\n   📅 {} · 📍 {}\n   💰 {}{}\n",
            offset + i + 1,
            event.title,
            format_event_date(event.start_time),
            event.location(),
            format_price(event.price),
            event.category.as_deref().map(|c| format!(" · 🏷 {}", c)).unwrap_or_default()
        ));
    }
    text.push_str(&format!("\n{}", create_pagination_info(page.page, page.total_pages, page.total_items)));
    text
}

pub fn event_list_keyboard(page: &Page<Event>, state: &ListingState) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = page
        .items
        .iter()
        .map(|event| vec![button(truncate_text(&event.title, 40), CallbackAction::Event(event.id))])
        .collect();

    if page.total_pages > 1 {
        let mut nav = Vec::new();
        if page.has_previous() {
            nav.push(button("◀", CallbackAction::Page(page.page - 1)));
        }
        for number in page_window(page.page, page.total_pages) {
            let label = if number == page.page { format!("·{}·", number) } else { number.to_string() };
            nav.push(button(label, CallbackAction::Page(number)));
        }
        if page.has_next() {
            nav.push(button("▶", CallbackAction::Page(page.page + 1)));
        }
        rows.push(nav);
    }

    rows.push(vec![
        button("🏷 Category", CallbackAction::Filter(FilterKey::Category)),
        button("🏙 City", CallbackAction::Filter(FilterKey::City)),
    ]);
    rows.push(vec![
        button("🔍 Search", CallbackAction::Filter(FilterKey::Search)),
        button("📌 Status", CallbackAction::Filter(FilterKey::Status)),
    ]);
    if !state.filters.is_empty() {
        rows.push(vec![button("✖ Clear filters", CallbackAction::ClearFilters)]);
    }
    InlineKeyboardMarkup::new(rows)
}

/// Choices for one filter, two per row, with a reset button
pub fn filter_choices(key: FilterKey) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = key
        .choices()
        .chunks(2)
        .enumerate()
        .map(|(row, pair)| {
            pair.iter()
                .enumerate()
                .map(|(col, choice)| button(capitalize(choice), CallbackAction::SetFilter(key, Some(row * 2 + col))))
                .collect()
        })
        .collect();

    let reset = match key {
        FilterKey::Category => "All categories",
        FilterKey::City => "All cities",
        FilterKey::Status => "All statuses",
        FilterKey::Search => "Any",
    };
    rows.push(vec![button(reset, CallbackAction::SetFilter(key, None))]);
    InlineKeyboardMarkup::new(rows)
}

pub fn event_details(details: &EventDetails) -> String {
    let event = &details.event;
    let mut text = format!("🎉 {}\n", event.title);
    if let Some(category) = &event.category {
        text.push_str(&format!("🏷 {}\n", category));
    }
    text.push_str(&format!("📅 {}\n", format_event_date(event.start_time)));
    if let Some(end) = event.end_time {
        text.push_str(&format!("🏁 Ends {}\n", format_event_date(end)));
    }
    text.push_str(&format!("📍 {}\n", event.location()));
    if let Some(address) = &event.address {
        text.push_str(&format!("🏠 {}\n", address));
    }
    if let Some(capacity) = event.capacity {
        text.push_str(&format!("👥 Capacity {}\n", capacity));
    }
    if let Some(organizer) = &event.organizer_name {
        text.push_str(&format!("🎤 Organized by {}\n", organizer));
    }
    if let Some(description) = &event.description {
        text.push_str(&format!("\n{}\n", truncate_text(description, 800)));
    }

    text.push_str("\n🎟 Tickets\n");
    if details.ticket_types.is_empty() {
        text.push_str(&format!("Entry: {}\n", format_price(event.price)));
    }
    for ticket_type in &details.ticket_types {
        let availability = if ticket_type.is_sold_out() {
            " (sold out)".to_string()
        } else {
            ticket_type.available_quantity.map(|n| format!(" ({} left)", n)).unwrap_or_default()
        };
        text.push_str(&format!(
            "• {} - {}{} [/buy {}]\n",
            ticket_type.name,
            format_price(Some(ticket_type.price)),
            availability,
            ticket_type.id
        ));
    }

    if details.review_count > 0 {
        text.push_str(&format!(
            "\n⭐ {:.1} from {} review{}\n",
            details.average_rating,
            details.review_count,
            if details.review_count == 1 { "" } else { "s" }
        ));
        for review in details.reviews.iter().take(3) {
            text.push_str(&format!(
                "  {} {}: {}\n",
                "★".repeat(review.rating.min(5) as usize),
                review.user.username,
                review.comment.as_deref().unwrap_or("")
            ));
        }
    }
    text
}

pub fn event_details_keyboard(details: &EventDetails, session: Option<&Session>) -> InlineKeyboardMarkup {
    let event_id = details.event.id;
    let mut rows: Vec<Vec<InlineKeyboardButton>> = details
        .ticket_types
        .iter()
        .filter(|t| !t.is_sold_out())
        .map(|t| {
            vec![button(
                format!("🎟 {} · {}", t.name, format_price(Some(t.price))),
                CallbackAction::Buy { ticket_type_id: t.id, quantity: 1 },
            )]
        })
        .collect();

    if details.ticket_types.is_empty() {
        rows.push(vec![button("📝 Register", CallbackAction::RegisterFor(event_id))]);
    }
    if session.is_some() {
        rows.push(vec![
            button("❤ Save", CallbackAction::WishAdd(event_id)),
            button("⭐ Review", CallbackAction::Review(event_id)),
        ]);
    }
    rows.push(vec![button("◀ Back to events", CallbackAction::Page(1))]);
    InlineKeyboardMarkup::new(rows)
}

pub fn profile(user: &User) -> String {
    let mut text = format!(
        "👤 {}\n📧 {}\n🎭 {}\n",
        user.username,
        user.email,
        user.role_label()
    );
    if let Some(phone) = &user.phone {
        text.push_str(&format!("📱 {}\n", phone));
    }
    if !user.is_active {
        text.push_str("⚠ Account deactivated\n");
    }
    if let Some(created_at) = user.created_at {
        text.push_str(&format!("Member since {}\n", created_at.format("%B %Y")));
    }
    text
}

pub fn dashboard(session: &Session, tickets: &[Ticket], orders: &[Order], now: DateTime<Utc>) -> String {
    let upcoming = tickets
        .iter()
        .filter(|t| t.event.as_ref().and_then(|e| e.start_time).map_or(false, |s| s > now))
        .count();
    let pending_payment = orders.iter().filter(|o| !o.is_paid() && !o.is_cancelled()).count();
    let spent: f64 = orders.iter().filter(|o| o.is_paid()).map(|o| o.total_amount).sum();

    let mut text = format!(
        "📊 Dashboard · {} ({})\n\n🎟 Tickets: {} ({} upcoming)\n🧾 Orders: {} ({} awaiting payment)\n💰 Spent: {}\n",
        session.user.username,
        session.user.role().label(),
        tickets.len(),
        upcoming,
        orders.len(),
        pending_payment,
        format_price(Some(spent))
    );
    if session.is_organizer() {
        text.push_str("\nOrganizer tools: /createevent · /myevents · /checkin\n");
    }
    if session.is_admin() {
        text.push_str("Admin tools: /admin · /stats\n");
    }
    text
}

pub fn tickets(tickets: &[Ticket]) -> String {
    if tickets.is_empty() {
        return "🎟 You have no tickets yet. Find something on /events!".to_string();
    }
    let mut text = String::from("🎟 Your tickets\n");
    for ticket in tickets {
        let event = ticket.event.as_ref();
        text.push_str(&format!(
            "\n• {} · {}\n  Code: {}\n  Status: {}",
            event.map(|e| e.title.as_str()).unwrap_or("Event"),
            ticket.ticket_type.as_ref().map(|t| t.name.as_str()).unwrap_or("Ticket"),
            ticket.code,
            ticket.status
        ));
        if let Some(start) = event.and_then(|e| e.start_time) {
            text.push_str(&format!("\n  📅 {}", format_event_date(start)));
        }
        if let Some(at) = ticket.checked_in_at {
            text.push_str(&format!("\n  ✅ Checked in {}", format_timestamp(at)));
        }
        text.push('\n');
    }
    text
}

pub fn orders(orders: &[Order]) -> String {
    if orders.is_empty() {
        return "🧾 You have no orders yet.".to_string();
    }
    let mut text = String::from("🧾 Your orders\n");
    for order in orders {
        text.push_str(&format!(
            "\n• {} · {}\n  {} · payment {} · {}\n",
            order.reference,
            order.event.as_ref().map(|e| e.title.as_str()).unwrap_or("Event"),
            format_price(Some(order.total_amount)),
            order.payment_status,
            order.order_status
        ));
    }
    text
}

pub fn orders_keyboard(orders: &[Order], now: DateTime<Utc>) -> InlineKeyboardMarkup {
    let rows = orders
        .iter()
        .map(|order| {
            let mut row = vec![button(format!("🔎 {}", order.reference), CallbackAction::Order(order.id))];
            if !order.is_paid() && !order.is_cancelled() {
                row.push(button("💳 Pay", CallbackAction::Pay(order.id)));
            }
            if order.can_cancel(now) {
                row.push(button("✖ Cancel", CallbackAction::CancelOrder(order.id)));
            }
            row
        })
        .collect::<Vec<_>>();
    InlineKeyboardMarkup::new(rows)
}

pub fn order_details(details: &OrderDetails) -> String {
    let order = &details.order;
    let mut text = format!(
        "🧾 Order {}\n{}\nStatus: {} · payment {}\n\n",
        order.reference,
        order.event.as_ref().map(|e| e.title.as_str()).unwrap_or(""),
        order.order_status,
        order.payment_status
    );
    for item in &details.order_items {
        text.push_str(&format!(
            "• {} × {} @ {} = {}\n",
            item.quantity,
            item.ticket_type,
            format_price(Some(item.unit_price)),
            format_price(Some(item.subtotal))
        ));
    }
    text.push_str(&format!("Total: {}\n", format_price(Some(order.total_amount))));
    if !details.tickets.is_empty() {
        text.push_str("\nTickets:\n");
        for ticket in &details.tickets {
            text.push_str(&format!("  {} ({})\n", ticket.code, ticket.status));
        }
    }
    if let Some(payment) = &details.payment {
        text.push_str(&format!("\nPaid via {} · {}\n", payment.provider, payment.status));
    }
    text
}

pub fn order_created(response: &CreateOrderResponse) -> String {
    let order = &response.order;
    let mut text = format!(
        "✅ {}\nReference: {}\nTotal: {}\n",
        response.message.as_deref().unwrap_or("Order created"),
        order.reference,
        format_price(Some(order.total_amount))
    );
    if order.payment_required {
        text.push_str("\nComplete payment to receive your tickets.");
    } else {
        text.push_str("\nYour tickets are ready, see /tickets.");
    }
    text
}

pub fn order_created_keyboard(response: &CreateOrderResponse) -> Option<InlineKeyboardMarkup> {
    response.order.payment_required.then(|| {
        InlineKeyboardMarkup::new(vec![vec![button("💳 Pay with M-Pesa", CallbackAction::Pay(response.order.id))]])
    })
}

pub fn payment_result(response: &PaymentResponse) -> String {
    format!(
        "💳 {}\nOrder {} · payment {}\nYour tickets are on /tickets.",
        response.message.as_deref().unwrap_or("Payment processed"),
        response.order.reference,
        response.order.payment_status
    )
}

pub fn my_events(events: &[Event]) -> String {
    if events.is_empty() {
        return "📋 You haven't created any events yet. Start with /createevent.".to_string();
    }
    let mut text = String::from("📋 Your events\n");
    for event in events {
        text.push_str(&format!(
            "\n• {} [{}]\n  📅 {} · 📍 {}\n",
            event.title,
            event.status,
            format_event_date(event.start_time),
            event.location()
        ));
    }
    text
}

pub fn event_summary(request: &CreateEventRequest) -> String {
    let mut text = format!(
        "📝 New event\n\n{}\n🏷 {}\n📍 {}, {}, {}\n📅 {}\n",
        request.title,
        if request.category.is_empty() { "Uncategorized" } else { &request.category },
        request.venue,
        if request.city.is_empty() { "-" } else { &request.city },
        request.country,
        format_event_date(request.start_time)
    );
    if let Some(end) = request.end_time {
        text.push_str(&format!("🏁 {}\n", format_event_date(end)));
    }
    text.push_str(&format!(
        "👥 {}\n💰 {}\n",
        request.capacity.map(|c| c.to_string()).unwrap_or_else(|| "Unlimited".to_string()),
        format_price(Some(request.price))
    ));
    if request.poster_url.is_some() {
        text.push_str("🖼 Poster attached\n");
    }
    text
}

pub fn check_in(response: &CheckInResponse) -> String {
    let ticket = &response.ticket;
    let mut text = format!(
        "✅ {}\nTicket {}",
        response.message.as_deref().unwrap_or("Ticket checked in"),
        ticket.code
    );
    if let Some(holder) = &ticket.user {
        text.push_str(&format!("\nHolder: {}", holder));
    }
    if let Some(at) = ticket.checked_in_at {
        text.push_str(&format!("\nAt: {}", format_timestamp(at)));
    }
    text
}

pub fn verification(result: &TicketVerification) -> String {
    let mut text = format!(
        "{} Ticket is {}\n\n🎉 {}\n🎟 {}\n👤 {}",
        if result.valid { "✅" } else { "❌" },
        result.status,
        result.event.title,
        result.ticket_type,
        result.user.name
    );
    if let Some(email) = &result.user.email {
        text.push_str(&format!(" ({})", email));
    }
    if let Some(start) = result.event.start_time {
        text.push_str(&format!("\n📅 {}", format_event_date(start)));
    }
    if result.checked_in {
        let at = result.checked_in_at.map(format_timestamp).unwrap_or_default();
        text.push_str(&format!("\n⚠ Already checked in {}", at));
    }
    text
}

pub fn wishlist(items: &[WishlistItem]) -> String {
    if items.is_empty() {
        return "❤ Your wishlist is empty. Save events from their detail page.".to_string();
    }
    let mut text = format!("❤ Wishlist ({})\n", items.len());
    for item in items {
        text.push_str(&format!(
            "\n• {}\n  📅 {} · 📍 {}\n",
            item.event.title,
            format_event_date(item.event.start_time),
            item.event.location()
        ));
    }
    text
}

pub fn wishlist_keyboard(items: &[WishlistItem]) -> InlineKeyboardMarkup {
    let rows = items
        .iter()
        .map(|item| {
            vec![
                button(truncate_text(&item.event.title, 30), CallbackAction::Event(item.event.id)),
                button("✖", CallbackAction::WishRemove(item.event.id)),
            ]
        })
        .collect::<Vec<_>>();
    InlineKeyboardMarkup::new(rows)
}

pub fn notifications(notifications: &[Notification]) -> String {
    if notifications.is_empty() {
        return "🔔 No notifications.".to_string();
    }
    let unread = notifications.iter().filter(|n| !n.is_read).count();
    let mut text = format!("🔔 Notifications ({} unread)\n", unread);
    for n in notifications {
        text.push_str(&format!(
            "\n{} {}\n{}\n",
            if n.is_read { "▫" } else { "🔹" },
            n.title,
            n.message.as_deref().unwrap_or("")
        ));
    }
    text
}

pub fn notifications_keyboard(notifications: &[Notification]) -> InlineKeyboardMarkup {
    let rows = notifications
        .iter()
        .filter(|n| !n.is_read)
        .map(|n| vec![button(format!("✔ Mark read: {}", truncate_text(&n.title, 30)), CallbackAction::MarkRead(n.id))])
        .collect::<Vec<_>>();
    InlineKeyboardMarkup::new(rows)
}

pub fn statistics(stats: &Statistics) -> String {
    let mut text = format!(
        "📈 Platform statistics\n\n👥 Users: {} ({} active)\n",
        stats.users.total, stats.users.active
    );
    for (role, count) in &stats.users.by_role {
        text.push_str(&format!("   {}: {}\n", capitalize(role), count));
    }
    text.push_str(&format!(
        "🎉 Events: {} (approved {}, pending {}, rejected {}, cancelled {})\n🧾 Orders: {} ({} completed)\n💰 Revenue: {}\n",
        stats.events.total,
        stats.events.approved,
        stats.events.pending,
        stats.events.rejected,
        stats.events.cancelled,
        stats.orders.total,
        stats.orders.completed,
        format_price(Some(stats.orders.revenue))
    ));
    text
}

pub fn admin_panel(stats: &Statistics, admin_tools: bool) -> (String, InlineKeyboardMarkup) {
    let text = format!("🛡 Admin panel\n\n{}", statistics(stats));
    let mut rows = vec![
        vec![button(
            format!("📋 Pending approvals ({})", stats.events.pending),
            CallbackAction::Admin(AdminSection::Pending),
        )],
        vec![
            button("👥 Users", CallbackAction::Admin(AdminSection::Users)),
            button("🧾 Orders", CallbackAction::Admin(AdminSection::Orders)),
        ],
        vec![button("📈 Refresh statistics", CallbackAction::Admin(AdminSection::Stats))],
    ];
    if admin_tools {
        rows.push(vec![button("🛠 Seed database", CallbackAction::Admin(AdminSection::Seed))]);
    }
    (text, InlineKeyboardMarkup::new(rows))
}

pub fn pending_event(pending: &PendingEvent) -> (String, InlineKeyboardMarkup) {
    let event = &pending.event;
    let mut text = format!(
        "⏳ {}\n📅 {}\n📍 {}\n",
        event.title,
        format_event_date(event.start_time),
        event.location()
    );
    if let Some(organizer) = &pending.organizer {
        text.push_str(&format!("🎤 {}", organizer.username));
        if let Some(email) = &organizer.email {
            text.push_str(&format!(" <{}>", email));
        }
        text.push('\n');
    }
    if let Some(description) = &event.description {
        text.push_str(&format!("\n{}\n", truncate_text(description, 300)));
    }
    let keyboard = InlineKeyboardMarkup::new(vec![vec![
        button("✅ Approve", CallbackAction::Decide(event.id, ApprovalAction::Approve)),
        button("❌ Reject", CallbackAction::Decide(event.id, ApprovalAction::Reject)),
    ]]);
    (text, keyboard)
}

pub fn users(users: &[User]) -> (String, InlineKeyboardMarkup) {
    let text = format!("👥 Users ({})\nPick a user to manage.", users.len());
    let rows = users
        .iter()
        .map(|user| {
            vec![button(
                format!(
                    "{}{} · {}",
                    if user.is_active { "" } else { "🚫 " },
                    user.username,
                    user.role_label()
                ),
                CallbackAction::User(user.id),
            )]
        })
        .collect::<Vec<_>>();
    (text, InlineKeyboardMarkup::new(rows))
}

/// Manage one user; every role is offered when the payload carries no role name
pub fn user_admin(user: &User) -> (String, InlineKeyboardMarkup) {
    let roles = Role::ALL
        .iter()
        .filter(|role| user.role != Some(**role))
        .map(|role| button(format!("Make {}", role.label()), CallbackAction::SetRole(user.id, *role)))
        .collect::<Vec<_>>();
    let toggle = if user.is_active {
        button("🚫 Deactivate", CallbackAction::SetStatus(user.id, false))
    } else {
        button("✅ Activate", CallbackAction::SetStatus(user.id, true))
    };
    (
        profile(user),
        InlineKeyboardMarkup::new(vec![roles, vec![toggle], vec![button("◀ Users", CallbackAction::Admin(AdminSection::Users))]]),
    )
}

pub fn admin_orders(orders: &[Order]) -> String {
    if orders.is_empty() {
        return "🧾 No orders yet.".to_string();
    }
    let revenue: f64 = orders.iter().filter(|o| o.is_paid()).map(|o| o.total_amount).sum();
    let mut text = format!("🧾 Orders ({}) · revenue {}\n", orders.len(), format_price(Some(revenue)));
    for order in orders.iter().take(30) {
        text.push_str(&format!(
            "\n• {} · {} · {} · {}",
            order.reference,
            order.user.as_ref().map(|u| u.username.as_str()).unwrap_or("-"),
            format_price(Some(order.total_amount)),
            order.payment_status
        ));
    }
    text
}

pub fn upload_hint() -> String {
    format!(
        "Send the poster as a photo or image file (max {} MB).",
        MAX_IMAGE_BYTES / (1024 * 1024)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::Paginator;
    use crate::models::UserMutationResponse;
    use serde_json::json;
    use teloxide::types::InlineKeyboardButtonKind;

    fn event(id: i64, title: &str) -> Event {
        serde_json::from_value(json!({
            "id": id, "title": title, "venue": "KICC", "city": "Nairobi", "price": 1500.0,
            "category": "Music", "status": "approved", "start_time": "2030-05-01T18:00:00"
        }))
        .unwrap()
    }

    fn session(role: Role) -> Session {
        let user: User = serde_json::from_value(json!({
            "id": 1, "username": "jane", "email": "jane@example.com", "role": role.as_str()
        }))
        .unwrap();
        Session::new(1, "token", user)
    }

    fn callbacks(keyboard: &InlineKeyboardMarkup) -> Vec<String> {
        keyboard
            .inline_keyboard
            .iter()
            .flatten()
            .filter_map(|b| match &b.kind {
                InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_help_depends_on_role() {
        assert!(!help(None).contains("/admin"));
        assert!(help(Some(&session(Role::Organizer))).contains("/createevent"));
        assert!(!help(Some(&session(Role::Organizer))).contains("/admin"));
        assert!(help(Some(&session(Role::Admin))).contains("/admin"));
    }

    #[test]
    fn test_event_list_navigation() {
        let events: Vec<Event> = (1..=30).map(|i| event(i, &format!("Event {}", i))).collect();
        let state = ListingState { page: 2, ..Default::default() };
        let page = Paginator::new(12).paginate(events, state.page);

        let text = event_list(&page, &state);
        assert!(text.contains("13. Event 13"));
        assert!(text.contains("Page 2 of 3"));

        let data = callbacks(&event_list_keyboard(&page, &state));
        assert!(data.contains(&"page:1".to_string()));
        assert!(data.contains(&"page:3".to_string()));
        assert!(data.contains(&"event:13".to_string()));
        assert!(!data.contains(&"clear".to_string()));
    }

    #[test]
    fn test_empty_filtered_list() {
        let state = ListingState::from_query("city=Kisumu");
        let page = Paginator::default().paginate(Vec::<Event>::new(), 1);
        let text = event_list(&page, &state);
        assert!(text.contains("No events found"));
        assert!(text.contains("City: Kisumu"));
        assert!(callbacks(&event_list_keyboard(&page, &state)).contains(&"clear".to_string()));
    }

    #[test]
    fn test_filter_choices_cover_all_options() {
        let data = callbacks(&filter_choices(FilterKey::City));
        assert_eq!(data.len(), crate::listing::CITIES.len() + 1);
        assert_eq!(data.last().map(String::as_str), Some("set:city:-"));
    }

    #[test]
    fn test_access_denied_text() {
        assert!(access_denied(&Access::RedirectToLogin).contains("/login"));
        let text = access_denied(&Access::Denied { role: Role::Attendee, required: vec![Role::Admin] });
        assert!(text.contains("Attendee"));
        assert!(text.contains("Admin"));
    }

    #[test]
    fn test_user_admin_offers_other_roles() {
        let user: User = serde_json::from_value(json!({
            "id": 7, "username": "sam", "email": "sam@example.com", "role": "organizer", "is_active": false
        }))
        .unwrap();
        let (_, keyboard) = user_admin(&user);
        let data = callbacks(&keyboard);
        assert!(data.contains(&"role:7:attendee".to_string()));
        assert!(data.contains(&"role:7:admin".to_string()));
        assert!(!data.contains(&"role:7:organizer".to_string()));
        assert!(data.contains(&"status:7:1".to_string()));
    }

    #[test]
    fn test_user_admin_without_role_name_offers_every_role() {
        let response: UserMutationResponse = serde_json::from_value(json!({
            "message": "User status updated",
            "user": {
                "id": 7, "username": "sam", "email": "sam@example.com", "phone": null,
                "role_id": 1, "is_active": true, "created_at": "2025-01-02T10:00:00"
            }
        }))
        .unwrap();
        let (text, keyboard) = user_admin(&response.user);
        assert!(text.contains("Unknown"));
        assert!(!text.contains("Attendee"));
        let data = callbacks(&keyboard);
        for role in ["attendee", "organizer", "admin"] {
            assert!(data.contains(&format!("role:7:{}", role)), "missing {}", role);
        }
        assert!(data.contains(&"status:7:0".to_string()));
    }
}
