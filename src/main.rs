use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use farm_market_client::catalog::{CategoryFilter, ListingQuery, SortMode};
use farm_market_client::client::{ApiClient, MediaUploader, Session};
use farm_market_client::config::ClientConfig;
use farm_market_client::error::{ClientError, ClientResult};
use farm_market_client::forms::{
    BuyerRegistrationForm, FarmerRegistrationForm, LoginForm, ProductForm,
};
use farm_market_client::models::{Product, UserRole};
use farm_market_client::notice::Notice;
use farm_market_client::services::{AuthService, BuyerService, CartService, FarmerService};
use farm_market_client::views::{CartViewModel, ProductListViewModel, QuantityChange};

#[derive(Parser)]
#[command(name = "farm-market", about = "Command-line client for the farm market API")]
struct Cli {
    /// Client configuration file (TOML).
    #[arg(long, default_value = "configs/client.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Browse active products.
    Products {
        #[arg(long, default_value = "All")]
        category: CategoryFilter,
        #[arg(long, default_value = "")]
        search: String,
        /// price_asc, price_desc, date_desc or date_asc.
        #[arg(long, default_value = "date_desc")]
        sort: SortMode,
    },
    /// Show one product.
    Product { id: i64 },
    #[command(subcommand)]
    Buyer(BuyerCommand),
    #[command(subcommand)]
    Farmer(FarmerCommand),
    /// Upload images to the media host and print their hosted URLs.
    Upload { files: Vec<PathBuf> },
}

#[derive(Args)]
struct LoginArgs {
    #[arg(long, env = "FARM_MARKET_EMAIL")]
    email: String,
    #[arg(long, env = "FARM_MARKET_PASSWORD", hide_env_values = true)]
    password: String,
}

impl LoginArgs {
    fn form(&self) -> LoginForm {
        LoginForm {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

#[derive(Subcommand)]
enum BuyerCommand {
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// "true" for contactless delivery.
        #[arg(long, default_value = "false")]
        contactless: String,
        /// morning, afternoon or evening.
        #[arg(long)]
        preferred_time: String,
    },
    /// Work with the signed-in buyer's cart.
    Cart {
        #[command(flatten)]
        login: LoginArgs,
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    Show,
    Add {
        product_id: i64,
        #[arg(default_value_t = 1)]
        quantity: u32,
    },
    Increment { product_id: i64 },
    Decrement { product_id: i64 },
    Remove { product_id: i64 },
    Checkout,
}

#[derive(Args)]
struct ProductArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    category_id: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    quantity: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Comma-separated image URLs.
    #[arg(long)]
    images: Option<String>,
}

impl ProductArgs {
    fn apply_to(self, form: &mut ProductForm) {
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(category_id) = self.category_id {
            form.category_id = category_id;
        }
        if let Some(price) = self.price {
            form.price = price;
        }
        if let Some(quantity) = self.quantity {
            form.quantity = quantity;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(images) = self.images {
            form.images = images;
        }
    }
}

#[derive(Subcommand)]
enum FarmerCommand {
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        farm_name: String,
        #[arg(long)]
        farm_size: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    Dashboard {
        #[command(flatten)]
        login: LoginArgs,
    },
    /// List the farmer's own products.
    List {
        #[command(flatten)]
        login: LoginArgs,
    },
    Add {
        #[command(flatten)]
        login: LoginArgs,
        #[command(flatten)]
        product: ProductArgs,
        /// Local image files to upload before creating the product.
        #[arg(long = "upload")]
        uploads: Vec<PathBuf>,
    },
    Edit {
        #[command(flatten)]
        login: LoginArgs,
        id: i64,
        #[command(flatten)]
        product: ProductArgs,
        #[arg(long)]
        active: Option<bool>,
    },
    Delete {
        #[command(flatten)]
        login: LoginArgs,
        id: i64,
    },
    /// Sign in, then end the farmer session on the server.
    Logout {
        #[command(flatten)]
        login: LoginArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let config = ClientConfig::load(Some(&cli.config))
        .context("Failed to load client configuration")?;
    info!("Using API at {}", config.base_url());

    let api = ApiClient::from_config(&config, Session::new())
        .context("Failed to initialize HTTP client")?;

    if let Err(e) = run(cli.command, &config, api).await {
        eprintln!("{}", Notice::from_error(&e));
        std::process::exit(1);
    }

    Ok(())
}

async fn run(command: Command, config: &ClientConfig, api: ApiClient) -> ClientResult<()> {
    match command {
        Command::Products {
            category,
            search,
            sort,
        } => {
            let mut view = ProductListViewModel::with_query(ListingQuery::new(category, search, sort));
            view.load(&BuyerService::new(api)).await;

            if let Some(notice) = view.take_notice() {
                return Err(ClientError::Application(notice.message));
            }

            println!(
                "{} of {} products ({}, sorted {})",
                view.visible().len(),
                view.products().len(),
                view.query().category,
                view.query().sort.label()
            );
            print_products(view.visible());
        }
        Command::Product { id } => {
            let product = BuyerService::new(api).product(id).await?;
            print_product_detail(&product);
        }
        Command::Buyer(command) => run_buyer(command, api).await?,
        Command::Farmer(command) => run_farmer(command, config, api).await?,
        Command::Upload { files } => {
            let uploader = media_uploader(config)?;
            for url in uploader.upload_all(&read_images(&files).await?).await? {
                println!("{}", url);
            }
        }
    }

    Ok(())
}

async fn run_buyer(command: BuyerCommand, api: ApiClient) -> ClientResult<()> {
    match command {
        BuyerCommand::Register {
            email,
            password,
            first_name,
            last_name,
            contactless,
            preferred_time,
        } => {
            let registration = BuyerRegistrationForm {
                email,
                password,
                first_name,
                last_name,
                contactless,
                preferred_time,
            }
            .validate()?;

            BuyerService::new(api).register(&registration).await?;
            println!("{}", Notice::success("Registration successful!"));
        }
        BuyerCommand::Cart { login, action } => {
            let user = AuthService::new(api.clone())
                .login(UserRole::Buyer, &login.form())
                .await?;
            info!("Signed in as {}", user.display_name());

            if let CartAction::Add {
                product_id,
                quantity,
            } = action
            {
                // Adding goes through the browsing view so the product list
                // is never touched locally.
                let mut browse = ProductListViewModel::new();
                let added = browse
                    .add_to_cart(&CartService::new(api.clone()), product_id, quantity)
                    .await;
                // On failure main reports the error; the view's copy of it
                // is dropped so it is shown once.
                added?;
                if let Some(notice) = browse.take_notice() {
                    println!("{}", notice);
                }
            }

            let mut cart = CartViewModel::new(CartService::new(api));
            cart.load().await;
            if let Some(notice) = cart.take_notice() {
                return Err(ClientError::Application(notice.message));
            }

            let outcome = match action {
                CartAction::Show | CartAction::Add { .. } => Ok(()),
                CartAction::Increment { product_id } => cart.increment(product_id).await.map(|_| ()),
                CartAction::Decrement { product_id } => match cart.decrement(product_id).await {
                    Ok(QuantityChange::Unchanged) => {
                        println!("Quantity is already 1; use `remove` to drop the item.");
                        Ok(())
                    }
                    other => other.map(|_| ()),
                },
                CartAction::Remove { product_id } => cart.remove(product_id).await,
                CartAction::Checkout => cart.checkout().await,
            };

            outcome?;
            if let Some(notice) = cart.take_notice() {
                println!("{}", notice);
            }

            if cart.is_checked_out() {
                println!("Thank you for your purchase. Your order has been placed successfully.");
            } else {
                print_cart(&cart);
            }
        }
    }

    Ok(())
}

async fn run_farmer(command: FarmerCommand, config: &ClientConfig, api: ApiClient) -> ClientResult<()> {
    let farmer = FarmerService::new(api.clone());

    match command {
        FarmerCommand::Register {
            first_name,
            last_name,
            email,
            farm_name,
            farm_size,
            location,
            password,
            confirm_password,
        } => {
            let registration = FarmerRegistrationForm {
                first_name,
                last_name,
                email,
                farm_name,
                farm_size,
                location,
                password,
                confirm_password,
            }
            .validate()?;

            let message = farmer.register(&registration).await?;
            println!("{}", Notice::success(or_default(message, "Registration successful!")));
        }
        FarmerCommand::Dashboard { login } => {
            sign_in_farmer(&api, &login).await?;
            let profile = farmer.dashboard().await?;

            println!("Farmer:    {} {}", profile.first_name, profile.last_name);
            println!("Email:     {}", profile.email);
            println!("Farm:      {}", profile.farm_name);
            println!("Farm size: {}", profile.farm_size);
            println!("Location:  {}", profile.location);
            if !profile.status.is_empty() {
                println!("Status:    {}", profile.status);
            }
        }
        FarmerCommand::List { login } => {
            sign_in_farmer(&api, &login).await?;
            let products = farmer.list_products().await?;

            println!("{} products", products.len());
            for product in &products {
                println!(
                    "{:>6}  {:<28} {:<10} {:>9.2}  qty {:<5} {}",
                    product.id,
                    product.name,
                    product.category_name(),
                    product.price,
                    product.quantity,
                    product.status_label()
                );
            }
        }
        FarmerCommand::Add {
            login,
            product,
            uploads,
        } => {
            let mut form = ProductForm::default();
            product.apply_to(&mut form);
            let validated = form.validate()?;

            sign_in_farmer(&api, &login).await?;

            let uploaded = if uploads.is_empty() {
                Vec::new()
            } else {
                media_uploader(config)?
                    .upload_all(&read_images(&uploads).await?)
                    .await?
            };

            let message = farmer.add_product(&validated.into_new_product(uploaded)).await?;
            println!("{}", Notice::success(or_default(message, "Product added successfully!")));
        }
        FarmerCommand::Edit {
            login,
            id,
            product,
            active,
        } => {
            sign_in_farmer(&api, &login).await?;

            let existing = farmer.find_product(id).await?;
            let mut form = ProductForm::from_product(&existing);
            product.apply_to(&mut form);
            let update = form
                .validate()?
                .into_update(id, active.unwrap_or(existing.is_active));

            let message = farmer.edit_product(&update).await?;
            println!("{}", Notice::success(or_default(message, "Product updated successfully!")));
        }
        FarmerCommand::Delete { login, id } => {
            sign_in_farmer(&api, &login).await?;
            let message = farmer.delete_product(id).await?;
            println!("{}", Notice::success(or_default(message, "Product deleted successfully!")));
        }
        FarmerCommand::Logout { login } => {
            sign_in_farmer(&api, &login).await?;
            let message = AuthService::new(api.clone()).logout().await?;
            println!("{}", Notice::success(message));
        }
    }

    Ok(())
}

async fn sign_in_farmer(api: &ApiClient, login: &LoginArgs) -> ClientResult<()> {
    let user = AuthService::new(api.clone())
        .login(UserRole::Farmer, &login.form())
        .await?;
    info!("Signed in as {}", user.display_name());
    Ok(())
}

fn media_uploader(config: &ClientConfig) -> ClientResult<MediaUploader> {
    MediaUploader::from_config(config).map_err(|e| ClientError::Validation(format!("{:#}", e)))
}

async fn read_images(paths: &[PathBuf]) -> ClientResult<Vec<Vec<u8>>> {
    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ClientError::Validation(format!("Cannot read {}: {}", path.display(), e))
        })?;
        images.push(bytes);
    }
    Ok(images)
}

fn or_default(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

fn print_products(products: &[Product]) {
    for product in products {
        println!(
            "{:>6}  {:<28} {:<10} {:>9.2}  qty {:<5} {}",
            product.id,
            product.name,
            product.category_name(),
            product.price,
            product.quantity,
            product.display_image().unwrap_or("-")
        );
    }
}

fn print_product_detail(product: &Product) {
    println!("{} (#{})", product.name, product.id);
    println!("Category:  {}", product.category_name());
    println!("Price:     {:.2}", product.price);
    println!("In stock:  {}", product.quantity);
    if let Some(location) = &product.farm_location {
        println!("Farm:      {}", location);
    }
    if let Some(created_at) = product.created_at {
        println!("Listed:    {}", created_at.format("%Y-%m-%d"));
    }
    if !product.description.is_empty() {
        println!();
        println!("{}", product.description);
    }
    for image in product.images.iter().filter(|image| !image.trim().is_empty()) {
        println!("Image:     {}", image.trim());
    }
}

fn print_cart(cart: &CartViewModel) {
    if cart.items().is_empty() {
        println!("Your cart is empty.");
        return;
    }

    for item in cart.items() {
        println!(
            "{:>6}  {:<28} {:>9.2} x {:<4} = {:>9.2}",
            item.product.id,
            item.product.name,
            item.product.price,
            item.quantity,
            item.line_total()
        );
    }
    println!("Total: {:.2}", cart.total());
}
