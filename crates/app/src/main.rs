//! Storefront CLI

use std::{io, process};

use clap::{Args, Parser, Subcommand};
use storefront::{
    address::DeliveryAddress,
    cart::{
        Cart, CartLineId,
        storage::{CartStorage, JsonFileStorage},
    },
    checkout::{CheckoutRequest, PaymentMethod},
    receipt::Receipt,
    support::{Author, ChatView, IssueCategory, IssuePriority, TicketDraft, UnknownVariant},
};
use storefront_app::{
    checkout::CheckoutService,
    config::StorefrontConfig,
    context::AppContext,
    domain::{
        orders::records::{OrderId, OrderRecord},
        products::records::ProductId,
        restaurants::records::RestaurantId,
    },
    observability,
    session::Session,
    support::{ChatDelays, SupportChat},
    views::{Loadable, Navigation, OrderConfirmationPage, ToastKind, Toasts},
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront CLI", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: StorefrontConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List products, optionally in one category
    Products {
        #[arg(long)]
        category: Option<String>,
    },

    /// Show one product
    Product { id: String },

    /// List restaurants
    Restaurants,

    /// Show a restaurant and its menu
    Menu { restaurant_id: String },

    /// Inspect or change the cart
    Cart(CartCommand),

    /// Place an order for the cart
    Checkout(CheckoutArgs),

    /// Show an order confirmation
    Order { id: String },

    /// List your orders
    Orders,

    /// Talk to the support assistant
    Chat,

    /// Open a support ticket
    Ticket(TicketArgs),

    /// List your support tickets
    Tickets,
}

#[derive(Debug, Args)]
struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Print the cart
    Show,

    /// Add a grocery product
    Add { product_id: String },

    /// Add a restaurant menu item
    AddFood {
        restaurant_id: String,
        food_id: String,
    },

    /// Set a line's quantity; zero removes it
    Set { line: String, quantity: u32 },

    /// Add one to a line
    Increment { line: String },

    /// Remove one from a line
    Decrement { line: String },

    /// Remove a line
    Remove { line: String },

    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct CheckoutArgs {
    #[arg(long)]
    street: String,

    #[arg(long)]
    city: String,

    #[arg(long)]
    state: String,

    #[arg(long)]
    zip: String,

    #[arg(long)]
    phone: String,

    #[arg(long)]
    landmark: Option<String>,

    #[arg(long)]
    alternate_phone: Option<String>,

    /// cod, card or upi
    #[arg(long, default_value_t = PaymentMethod::Cod)]
    payment: PaymentMethod,

    #[arg(long)]
    notes: Option<String>,
}

#[derive(Debug, Args)]
struct TicketArgs {
    #[arg(long)]
    title: String,

    #[arg(long)]
    description: String,

    /// general, order, delivery, payment, product or account
    #[arg(long, default_value_t = IssueCategory::General)]
    category: IssueCategory,

    /// low, medium, high or urgent
    #[arg(long, default_value_t = IssuePriority::Medium)]
    priority: IssuePriority,
}

struct App {
    config: StorefrontConfig,
    context: AppContext,
    session: Session,
    storage: JsonFileStorage,
}

#[tokio::main]
pub async fn main() {
    StorefrontConfig::load_env();

    let cli = Cli::parse();

    if let Err(error) = observability::init(&cli.config.logging) {
        eprintln!("{error}");
        process::exit(1);
    }

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let app = App {
        context: AppContext::from_config(cli.config.backend_config()),
        session: cli.config.session(),
        storage: JsonFileStorage::new(cli.config.cart_path()),
        config: cli.config,
    };

    let mut toasts = Toasts::default();

    let result = match cli.command {
        Commands::Products { category } => list_products(&app, category, &mut toasts).await,
        Commands::Product { id } => show_product(&app, id, &mut toasts).await,
        Commands::Restaurants => list_restaurants(&app, &mut toasts).await,
        Commands::Menu { restaurant_id } => show_menu(&app, restaurant_id, &mut toasts).await,
        Commands::Cart(CartCommand { command }) => cart(&app, command, &mut toasts).await,
        Commands::Checkout(args) => checkout(&app, args, &mut toasts).await,
        Commands::Order { id } => show_order(&app, OrderId::new(id), &mut toasts).await,
        Commands::Orders => list_orders(&app).await,
        Commands::Chat => chat(&app).await,
        Commands::Ticket(args) => ticket(&app, args, &mut toasts).await,
        Commands::Tickets => list_tickets(&app).await,
    };

    for toast in toasts.drain() {
        match toast.kind {
            ToastKind::Success => println!("{}", toast.message),
            ToastKind::Error => eprintln!("{}", toast.message),
        }
    }

    result
}

fn load_cart(app: &App) -> Result<Cart, String> {
    let currency = app.config.currency().map_err(|error| error.to_string())?;

    app.storage
        .load(currency)
        .map_err(|error| format!("failed to load cart: {error}"))
}

fn save_cart(app: &App, cart: &Cart) -> Result<(), String> {
    app.storage
        .save(cart)
        .map_err(|error| format!("failed to save cart: {error}"))
}

fn print_receipt(receipt: &Receipt) -> Result<(), String> {
    receipt
        .write_to(io::stdout().lock())
        .map_err(|error| format!("failed to print receipt: {error}"))
}

async fn list_products(
    app: &App,
    category: Option<String>,
    toasts: &mut Toasts,
) -> Result<(), String> {
    let page = app.context.pages().category(category.as_deref(), toasts).await;

    match page {
        Loadable::Ready(products) => {
            for product in products {
                println!("{}\t{}\t{}", product.id, product.name, product.price);
            }
        }
        Loadable::Empty | Loadable::Loading => println!("No products found"),
    }

    Ok(())
}

async fn show_product(app: &App, id: String, toasts: &mut Toasts) -> Result<(), String> {
    let page = app
        .context
        .pages()
        .product(ProductId::new(id), toasts)
        .await;

    if let Loadable::Ready(page) = page {
        let product = page.product;

        println!("{} ({})", product.name, product.id);
        println!("price: {}", product.price);

        for (label, value) in [
            ("category", &product.category),
            ("unit", &product.unit),
            ("brand", &product.brand),
            ("type", &product.kind),
            ("description", &product.description),
        ] {
            if let Some(value) = value {
                println!("{label}: {value}");
            }
        }

        if !page.keywords.is_empty() {
            println!("keywords: {}", page.keywords.join(", "));
        }
    }

    Ok(())
}

async fn list_restaurants(app: &App, toasts: &mut Toasts) -> Result<(), String> {
    match app.context.pages().restaurants(toasts).await {
        Loadable::Ready(restaurants) => {
            for restaurant in restaurants {
                println!(
                    "{}\t{}\t{}",
                    restaurant.id,
                    restaurant.name,
                    restaurant.cuisine.unwrap_or_default()
                );
            }
        }
        Loadable::Empty | Loadable::Loading => println!("No restaurants found"),
    }

    Ok(())
}

async fn show_menu(app: &App, restaurant_id: String, toasts: &mut Toasts) -> Result<(), String> {
    let page = app
        .context
        .pages()
        .restaurant(RestaurantId::new(restaurant_id), toasts)
        .await;

    if let Loadable::Ready(page) = page {
        println!("{}", page.restaurant.name);

        for food in page.menu {
            let availability = if food.available { "" } else { " (unavailable)" };

            println!("{}\t{}\t{}{availability}", food.id, food.name, food.price);
        }
    }

    Ok(())
}

/// Cart line shown as `line`, falling back to a product id.
fn line_id(cart: &Cart, line: &str) -> CartLineId {
    cart.iter()
        .map(|entry| entry.id())
        .find(|id| id.to_string() == line)
        .cloned()
        .unwrap_or_else(|| CartLineId::product(line))
}

async fn cart(app: &App, command: CartSubcommand, toasts: &mut Toasts) -> Result<(), String> {
    let mut cart = load_cart(app)?;

    match command {
        CartSubcommand::Show => {}
        CartSubcommand::Add { product_id } => {
            let product = app
                .context
                .products
                .get_product(ProductId::new(product_id))
                .await
                .map_err(|error| format!("failed to add to cart: {error}"))?;

            let quantity = cart.add(product.cart_line_id(), product.cart_product());

            toasts.success(format!("{} × {quantity} in cart", product.name));
        }
        CartSubcommand::AddFood {
            restaurant_id,
            food_id,
        } => {
            let menu = app
                .context
                .restaurants
                .list_menu(RestaurantId::new(restaurant_id))
                .await
                .map_err(|error| format!("failed to add to cart: {error}"))?;

            let food = menu
                .into_iter()
                .find(|food| food.id.as_str() == food_id)
                .ok_or_else(|| format!("menu item {food_id} not found"))?;

            if !food.available {
                return Err(format!("{} is currently unavailable", food.name));
            }

            let quantity = cart.add(food.cart_line_id(), food.cart_product());

            toasts.success(format!("{} × {quantity} in cart", food.name));
        }
        CartSubcommand::Set { line, quantity } => {
            cart.update_quantity(&line_id(&cart, &line), quantity)
                .map_err(|error| error.to_string())?;
        }
        CartSubcommand::Increment { line } => {
            cart.increment(&line_id(&cart, &line))
                .map_err(|error| error.to_string())?;
        }
        CartSubcommand::Decrement { line } => {
            cart.decrement(&line_id(&cart, &line))
                .map_err(|error| error.to_string())?;
        }
        CartSubcommand::Remove { line } => {
            if !cart.remove(&line_id(&cart, &line)) {
                return Err(format!("{line} is not in the cart"));
            }
        }
        CartSubcommand::Clear => cart.clear(),
    }

    save_cart(app, &cart)?;

    if cart.is_empty() {
        println!("Your cart is empty");
        return Ok(());
    }

    for line in cart.iter() {
        println!("{}\t{}", line.id(), line.product().name);
    }

    let receipt = Receipt::from_cart(&cart).map_err(|error| error.to_string())?;

    print_receipt(&receipt)
}

async fn checkout(app: &App, args: CheckoutArgs, toasts: &mut Toasts) -> Result<(), String> {
    let mut cart = load_cart(app)?;

    let request = CheckoutRequest {
        address: DeliveryAddress {
            street: args.street,
            city: args.city,
            state: args.state,
            zip: args.zip,
            phone: args.phone,
            landmark: args.landmark,
            alternate_phone: args.alternate_phone,
        },
        payment_method: args.payment,
        notes: args.notes,
    };

    let service = CheckoutService::new(
        app.context.orders.clone(),
        std::sync::Arc::new(app.storage.clone()),
    );

    match service.place_order(&app.session, &mut cart, &request).await {
        Ok(placed) => {
            toasts.success("Order placed successfully!");

            match placed.navigation() {
                Navigation::OrderConfirmation(order) => show_order(app, order, toasts).await,
                next => Err(format!("unexpected destination {next:?}")),
            }
        }
        Err(error) => match error.navigation() {
            Some(next) => Err(format!("{error} (go to {next:?})")),
            None => Err(error.to_string()),
        },
    }
}

async fn show_order(app: &App, order: OrderId, toasts: &mut Toasts) -> Result<(), String> {
    let mut page = OrderConfirmationPage::new(app.context.orders.clone(), order);

    let state = page
        .load(&app.session, toasts)
        .await
        .map_err(|error| error.to_string())?;

    if let Loadable::Ready(order) = state {
        print_order(app, order)?;
    }

    Ok(())
}

fn print_order(app: &App, order: &OrderRecord) -> Result<(), String> {
    let currency = app.config.currency().map_err(|error| error.to_string())?;

    println!("Order {} ({:?})", order.id, order.status);

    if let Some(created_at) = order.created_at {
        println!("placed: {created_at}");
    }

    println!("deliver to: {}", order.delivery_address);
    println!("payment: {}", order.payment_method);

    if let Some(notes) = &order.notes {
        println!("notes: {notes}");
    }

    let lines = order
        .items
        .iter()
        .map(|item| {
            let name = item
                .product_id
                .as_ref()
                .map(|id| format!("product {id}"))
                .or_else(|| item.restaurant_food_id.as_ref().map(|id| format!("menu item {id}")))
                .unwrap_or_default();

            storefront::receipt::ReceiptLine::new(name, item.quantity, item.price, currency)
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|error| error.to_string())?;

    let subtotal = storefront::pricing::sum_totals(
        order
            .items
            .iter()
            .map(|item| storefront::pricing::line_total(item.price, item.quantity)),
    )
    .map_err(|error| error.to_string())?;

    let receipt = Receipt::new(
        lines,
        storefront::pricing::money(subtotal, currency).map_err(|error| error.to_string())?,
        storefront::pricing::money(order.total_amount, currency)
            .map_err(|error| error.to_string())?,
    );

    print_receipt(&receipt)
}

async fn list_orders(app: &App) -> Result<(), String> {
    let user = app
        .session
        .require_user()
        .map_err(|error| error.to_string())?;

    let orders = app
        .context
        .orders
        .list_orders(user.clone())
        .await
        .map_err(|error| format!("failed to load orders: {error}"))?;

    if orders.is_empty() {
        println!("You have no orders yet");
    }

    for order in orders {
        println!(
            "{}\t{:?}\t{}\t{} items",
            order.id,
            order.status,
            order.total_amount,
            order.items.len()
        );
    }

    Ok(())
}

async fn chat(app: &App) -> Result<(), String> {
    let responder = app.config.responder().map_err(|error| error.to_string())?;
    let chat = SupportChat::new(responder, app.context.issues.clone(), ChatDelays::default());

    let mut printed = 0;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_new_messages(&chat, &mut printed);
    println!("(type /ticket to open a support ticket, /quit to leave)");

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|error| format!("failed to read input: {error}"))?
    {
        match line.trim() {
            "/quit" => break,
            "/ticket" => {
                chat.open_ticket_form();

                let title = prompt(&mut lines, "title").await?;
                let description = prompt(&mut lines, "description").await?;
                let category = prompt_choice(
                    &mut lines,
                    "category [general]",
                    IssueCategory::parse_or_default,
                )
                .await?;
                let priority = prompt_choice(
                    &mut lines,
                    "priority [medium]",
                    IssuePriority::parse_or_default,
                )
                .await?;

                chat.set_draft(TicketDraft {
                    title,
                    description,
                    category,
                    priority,
                });

                match chat.submit_ticket(&app.session).await {
                    Ok(issue) => println!("ticket {} created", issue.id),
                    Err(error) => {
                        eprintln!("{error}");
                        chat.close_ticket_form();
                    }
                }
            }
            text => {
                chat.send(text)
                    .settle()
                    .await
                    .map_err(|error| error.to_string())?;
            }
        }

        if chat.view() == ChatView::Conversation {
            print_new_messages(&chat, &mut printed);
        }
    }

    Ok(())
}

async fn prompt<R>(
    lines: &mut tokio::io::Lines<R>,
    label: &str,
) -> Result<String, String>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    println!("{label}:");

    let line = lines
        .next_line()
        .await
        .map_err(|error| format!("failed to read input: {error}"))?;

    Ok(line.unwrap_or_default())
}

/// Ask until the answer parses.
async fn prompt_choice<R, T>(
    lines: &mut tokio::io::Lines<R>,
    label: &str,
    parse: fn(&str) -> Result<T, UnknownVariant>,
) -> Result<T, String>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    loop {
        match parse(&prompt(lines, label).await?) {
            Ok(value) => return Ok(value),
            Err(error) => eprintln!("{error}"),
        }
    }
}

fn print_new_messages(chat: &SupportChat, printed: &mut usize) {
    let messages = chat.messages();

    for message in messages.iter().skip(*printed) {
        if message.author == Author::Bot {
            println!("assistant: {}", message.text);
        }
    }

    *printed = messages.len();
}

async fn ticket(app: &App, args: TicketArgs, toasts: &mut Toasts) -> Result<(), String> {
    let chat = SupportChat::new(
        storefront::support::Responder::default(),
        app.context.issues.clone(),
        ChatDelays::default(),
    );

    chat.open_ticket_form();
    chat.set_draft(TicketDraft {
        title: args.title,
        description: args.description,
        category: args.category,
        priority: args.priority,
    });

    let issue = chat
        .submit_ticket(&app.session)
        .await
        .map_err(|error| error.to_string())?;

    toasts.success(format!(
        "ticket {} created ({}, {})",
        issue.id, issue.category, issue.priority
    ));

    Ok(())
}

async fn list_tickets(app: &App) -> Result<(), String> {
    let user = app
        .session
        .require_user()
        .map_err(|error| error.to_string())?;

    let issues = app
        .context
        .issues
        .list_issues(user.clone())
        .await
        .map_err(|error| format!("failed to load tickets: {error}"))?;

    if issues.is_empty() {
        println!("You have no support tickets");
    }

    for issue in issues {
        println!(
            "{}\t{:?}\t{}\t{}\t{}",
            issue.id, issue.status, issue.category, issue.priority, issue.title
        );
    }

    Ok(())
}
