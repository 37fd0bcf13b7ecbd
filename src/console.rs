//! Line-oriented front end driving the list screens against a live API.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};

use crate::domain::product::Product;
use crate::domain::types::UserId;
use crate::domain::user::User;
use crate::forms::auth::LoginForm;
use crate::forms::product::{StockAdjustment, UpdateStockForm};
use crate::models::config::ClientConfig;
use crate::notifications::ProductNotification;
use crate::query::product::{self as product_query, CatalogParams, ProductCatalog};
use crate::query::user::{self as user_query, UserDirectory};
use crate::query::{ListSource, ListView, LoadingState, QueryController, SortDirection, SortKey};
use crate::repository::{HttpRepository, UserReader};
use crate::routes::{self, Route};
use crate::services::{self, ServiceError};
use crate::session::SessionStore;

const HELP: &str = "\
commands:
  login <username> <password>   sign in and open the start page
  logout | whoami
  open <path>                   e.g. /products?search=lamp&min_price=10
  search <text>                 debounced free-text search
  filter <name> [value]         set or clear a filter
  draft <name> <value>          debounced filter input (price ranges)
  sort <field> [asc|desc] | order <asc|desc>
  page <n> | size <n> | reset | refresh | show | link
  categories [term] | roles
  stock <product-id> <add|subtract> <n> | delete <product-id>
  toggle <user-id>
  help | quit";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Login { username: String, password: String },
    Logout,
    WhoAmI,
    Open(String),
    Search(String),
    Filter { name: String, value: Option<String> },
    Draft { name: String, value: String },
    Sort {
        field: String,
        order: Option<SortDirection>,
    },
    Order(SortDirection),
    Page(usize),
    PageSize(usize),
    Reset,
    Refresh,
    Show,
    Link,
    Categories(Option<String>),
    Roles,
    Stock {
        id: String,
        kind: StockAdjustment,
        change: i64,
    },
    DeleteProduct(String),
    ToggleUser(String),
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match (name, args.as_slice()) {
            ("login", [username, password]) => Command::Login {
                username: username.to_string(),
                password: password.to_string(),
            },
            ("logout", []) => Command::Logout,
            ("whoami", []) => Command::WhoAmI,
            ("open", [path]) => Command::Open(path.to_string()),
            ("search", _) => Command::Search(rest.to_string()),
            ("filter", [name]) => Command::Filter {
                name: name.to_string(),
                value: None,
            },
            ("filter", [name, value]) => Command::Filter {
                name: name.to_string(),
                value: Some(value.to_string()),
            },
            ("draft", [name, value]) => Command::Draft {
                name: name.to_string(),
                value: value.to_string(),
            },
            ("sort", [field]) => Command::Sort {
                field: field.to_string(),
                order: None,
            },
            ("sort", [field, order]) => Command::Sort {
                field: field.to_string(),
                order: Some(parse_order(order)?),
            },
            ("order", [order]) => Command::Order(parse_order(order)?),
            ("page", [page]) => Command::Page(parse_number(page)?),
            ("size", [size]) => Command::PageSize(parse_number(size)?),
            ("reset", []) => Command::Reset,
            ("refresh", []) => Command::Refresh,
            ("show", []) => Command::Show,
            ("link", []) => Command::Link,
            ("categories", []) => Command::Categories(None),
            ("categories", _) => Command::Categories(Some(rest.to_string())),
            ("roles", []) => Command::Roles,
            ("stock", [id, kind, change]) => Command::Stock {
                id: id.to_string(),
                kind: match *kind {
                    "add" => StockAdjustment::Add,
                    "subtract" => StockAdjustment::Subtract,
                    other => return Err(format!("Unknown stock adjustment `{other}`")),
                },
                change: change
                    .parse()
                    .map_err(|_| format!("`{change}` is not a number"))?,
            },
            ("delete", [id]) => Command::DeleteProduct(id.to_string()),
            ("toggle", [id]) => Command::ToggleUser(id.to_string()),
            ("help", _) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            _ => return Err(format!("Cannot parse `{line}`, type `help`")),
        };
        Ok(command)
    }
}

fn parse_order(value: &str) -> Result<SortDirection, String> {
    SortDirection::parse(value)
        .ok_or_else(|| format!("Order must be asc or desc, got `{value}`"))
}

fn parse_number(value: &str) -> Result<usize, String> {
    value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))
}

/// One line of a rendered list.
trait Row {
    fn row(&self) -> String;
}

impl Row for Product {
    fn row(&self) -> String {
        format!(
            "{:<38} {:<30} {:>12.2} {:>6} {}",
            self.id.as_str(),
            self.name.as_str(),
            self.price.get(),
            self.stock.get(),
            self.effective_stock_status().label()
        )
    }
}

impl Row for User {
    fn row(&self) -> String {
        format!(
            "{:<38} {:<20} {:<30} {:<8} {}",
            self.id.as_str(),
            self.username.as_str(),
            self.email.as_str(),
            self.role.as_ref().map(|r| r.name.as_str()).unwrap_or("-"),
            if self.is_active { "active" } else { "inactive" }
        )
    }
}

fn render<T: Row, S: SortKey>(view: &ListView<T, S>) {
    match view.loading {
        LoadingState::Initial => {
            println!("loading...");
            return;
        }
        LoadingState::Refresh => println!("refreshing..."),
        LoadingState::Idle => {}
    }
    for item in &view.items {
        println!("  {}", item.row());
    }
    let pages: Vec<String> = view
        .pages
        .iter()
        .map(|page| match page {
            Some(page) if *page == view.query.page => format!("[{page}]"),
            Some(page) => page.to_string(),
            None => "...".to_string(),
        })
        .collect();
    println!(
        "  page {}/{} ({}) total {} | sort {} {}",
        view.query.page,
        view.page_count,
        pages.join(" "),
        view.total,
        view.query.sort_by.as_str(),
        view.query.order.as_str()
    );
    if let Some(error) = &view.error {
        println!("  error: {error}");
    }
    for (input, message) in &view.validation_errors {
        println!("  {input}: {message}");
    }
}

/// Prints the list whenever a fetch settles or an input is rejected.
fn watch_list<T, S>(mut updates: watch::Receiver<ListView<T, S>>)
where
    T: Row + Clone + Send + Sync + 'static,
    S: SortKey,
{
    tokio::spawn(async move {
        let mut loading = LoadingState::Idle;
        let mut rejected = BTreeMap::new();
        while updates.changed().await.is_ok() {
            let view = updates.borrow_and_update().clone();
            let settled = loading != LoadingState::Idle && view.loading == LoadingState::Idle;
            if settled || view.validation_errors != rejected {
                render(&view);
            }
            loading = view.loading;
            rejected = view.validation_errors;
        }
    });
}

fn apply<L: ListSource>(controller: &QueryController<L>, command: Command) -> Result<(), String> {
    match command {
        Command::Search(text) => controller.set_free_text(text),
        Command::Filter { name, value } => controller.set_filter(name, value),
        Command::Draft { name, value } => controller.set_filter_draft(name, value),
        Command::Sort { field, order } => {
            let sort_by = L::Sort::parse(&field)
                .ok_or_else(|| format!("Cannot sort by `{field}`"))?;
            controller.set_sort(sort_by, order.unwrap_or(controller.view().query.order));
        }
        Command::Order(order) => controller.set_sort_order(order),
        Command::Page(page) => controller.set_page(page),
        Command::PageSize(size) => controller.set_page_size(size),
        Command::Reset => controller.reset_all(),
        Command::Refresh => controller.refresh(),
        other => return Err(format!("{other:?} is not a list command")),
    }
    Ok(())
}

enum Screen {
    Empty,
    Products(QueryController<ProductCatalog<HttpRepository>>),
    Users(QueryController<UserDirectory<HttpRepository>>),
}

impl Screen {
    async fn close(self) {
        match self {
            Screen::Empty => {}
            Screen::Products(controller) => controller.shutdown().await,
            Screen::Users(controller) => controller.shutdown().await,
        }
    }
}

pub struct Console {
    config: ClientConfig,
    repo: Arc<HttpRepository>,
    session: Arc<SessionStore>,
    screen: Screen,
}

impl Console {
    pub fn new(
        config: ClientConfig,
        repo: Arc<HttpRepository>,
        session: Arc<SessionStore>,
    ) -> Self {
        Self {
            config,
            repo,
            session,
            screen: Screen::Empty,
        }
    }

    /// Reads commands from stdin until `quit` or end of input.
    pub async fn run(
        mut self,
        mut notifications: mpsc::Receiver<ProductNotification>,
    ) -> std::io::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!("{HELP}");

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match Command::parse(&line) {
                        Ok(Command::Quit) => break,
                        Ok(command) => self.execute(command).await,
                        Err(message) => println!("{message}"),
                    }
                }
                Some(notification) = notifications.recv() => {
                    println!(
                        "[{}] {}: {} ({:.2})",
                        notification.timestamp.format("%H:%M:%S"),
                        notification.kind(),
                        notification.name,
                        notification.price as f64
                    );
                }
            }
        }

        std::mem::replace(&mut self.screen, Screen::Empty)
            .close()
            .await;
        Ok(())
    }

    async fn execute(&mut self, command: Command) {
        let repo = Arc::clone(&self.repo);
        let result = match command {
            Command::Help => {
                println!("{HELP}");
                Ok(())
            }
            Command::Login { username, password } => {
                let form = LoginForm { username, password };
                match services::auth::login(repo.as_ref(), &self.session, &form).await {
                    Ok(user) => {
                        println!("Signed in as {} ({})", user.username, user.full_name);
                        self.open(&Route::start_page(&user).path()).await;
                        Ok(())
                    }
                    Err(err) => Err(err),
                }
            }
            Command::Logout => {
                services::auth::logout(repo.as_ref(), &self.session).await;
                std::mem::replace(&mut self.screen, Screen::Empty)
                    .close()
                    .await;
                println!("Signed out");
                Ok(())
            }
            Command::WhoAmI => {
                match self.session.user() {
                    Some(user) => println!("{} <{}>", user.username, user.email),
                    None => println!("anonymous"),
                }
                Ok(())
            }
            Command::Open(path) => {
                self.open(&path).await;
                Ok(())
            }
            Command::Categories(search) => {
                services::catalog::load_categories(repo.as_ref(), search.as_deref())
                    .await
                    .map(|categories| {
                        for category in categories {
                            println!("  {:<38} {}", category.id.as_str(), category.name);
                        }
                    })
            }
            Command::Roles => services::catalog::load_roles(repo.as_ref())
                .await
                .map(|roles| {
                    for role in roles {
                        println!("  {:<12} {}", role.id.as_str(), role.name);
                    }
                }),
            Command::Stock { id, kind, change } => {
                let form = UpdateStockForm { change, kind };
                match self.session.user() {
                    Some(user) => services::products::adjust_stock(repo.as_ref(), &user, &id, &form)
                        .await
                        .map(|product| {
                            println!("{} now has {} in stock", product.name, product.stock.get());
                            self.refresh();
                        }),
                    None => Err(ServiceError::Unauthorized),
                }
            }
            Command::DeleteProduct(id) => match self.session.user() {
                Some(user) => services::products::delete_product(repo.as_ref(), &user, &id)
                    .await
                    .map(|()| {
                        println!("Deleted {id}");
                        self.refresh();
                    }),
                None => Err(ServiceError::Unauthorized),
            },
            Command::ToggleUser(id) => match self.session.user() {
                Some(user) => self.toggle_user(&user, &id).await,
                None => Err(ServiceError::Unauthorized),
            },
            Command::Show => {
                match &self.screen {
                    Screen::Products(controller) => render(&controller.view()),
                    Screen::Users(controller) => render(&controller.view()),
                    Screen::Empty => println!("No list is open"),
                }
                Ok(())
            }
            Command::Link => {
                match &self.screen {
                    Screen::Products(controller) => {
                        match CatalogParams::from_query(&controller.view().query).to_query_string()
                        {
                            Ok(query) => println!("/products?{query}"),
                            Err(err) => println!("Cannot build link: {err}"),
                        }
                    }
                    _ => println!("Only the catalog has shareable links"),
                }
                Ok(())
            }
            list_command => {
                let applied = match &self.screen {
                    Screen::Products(controller) => apply(controller, list_command),
                    Screen::Users(controller) => apply(controller, list_command),
                    Screen::Empty => Err("No list is open".to_string()),
                };
                if let Err(message) = applied {
                    println!("{message}");
                }
                Ok(())
            }
        };

        if let Err(err) = result {
            println!("error: {err}");
        }
    }

    async fn toggle_user(&self, actor: &User, id: &str) -> Result<(), ServiceError> {
        let target = self.repo.get_user(&UserId::new(id)?).await?;
        let updated = services::users::toggle_active(self.repo.as_ref(), actor, &target).await?;
        println!(
            "{} is now {}",
            updated.username,
            if updated.is_active { "active" } else { "inactive" }
        );
        self.refresh();
        Ok(())
    }

    fn refresh(&self) {
        match &self.screen {
            Screen::Products(controller) => controller.refresh(),
            Screen::Users(controller) => controller.refresh(),
            Screen::Empty => {}
        }
    }

    async fn open(&mut self, location: &str) {
        let user = self.session.user();
        let route = routes::resolve(location, user.as_ref());
        std::mem::replace(&mut self.screen, Screen::Empty)
            .close()
            .await;

        let repo = Arc::clone(&self.repo);
        match &route {
            Route::AdminDashboard => {
                let controller = QueryController::spawn(
                    Arc::new(ProductCatalog::new(repo)),
                    product_query::admin_options(&self.config),
                );
                watch_list(controller.subscribe());
                self.screen = Screen::Products(controller);
            }
            Route::Home | Route::Products => {
                let params = location
                    .split_once('?')
                    .map(|(_, query)| CatalogParams::parse(query))
                    .transpose()
                    .unwrap_or_else(|err| {
                        log::warn!("Ignoring malformed catalog link: {err}");
                        None
                    });
                let controller = QueryController::spawn(
                    Arc::new(ProductCatalog::new(repo)),
                    product_query::catalog_options(&self.config, params.as_ref()),
                );
                watch_list(controller.subscribe());
                self.screen = Screen::Products(controller);
            }
            Route::AdminUsers => {
                let controller = QueryController::spawn(
                    Arc::new(UserDirectory::new(repo)),
                    user_query::admin_options(&self.config),
                );
                watch_list(controller.subscribe());
                self.screen = Screen::Users(controller);
            }
            Route::ProductDetail(id) => {
                match services::products::get_product(repo.as_ref(), id).await {
                    Ok(product) => {
                        println!("{}", product.row());
                        if let Some(description) = &product.description {
                            println!("  {}", description.as_str());
                        }
                    }
                    Err(err) => println!("error: {err}"),
                }
            }
            Route::Root | Route::Login | Route::Register => {
                println!("Sign in with `login <username> <password>`");
            }
            Route::NotFound => println!("Page not found"),
        }
        println!("at {route}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list_commands() {
        assert_eq!(
            Command::parse("search  desk lamp "),
            Ok(Command::Search("desk lamp".to_string()))
        );
        assert_eq!(
            Command::parse("filter category_id"),
            Ok(Command::Filter {
                name: "category_id".to_string(),
                value: None
            })
        );
        assert_eq!(
            Command::parse("sort price asc"),
            Ok(Command::Sort {
                field: "price".to_string(),
                order: Some(SortDirection::Asc)
            })
        );
        assert_eq!(Command::parse("page 3"), Ok(Command::Page(3)));
    }

    #[test]
    fn parses_admin_commands() {
        assert_eq!(
            Command::parse("stock p-1 subtract 2"),
            Ok(Command::Stock {
                id: "p-1".to_string(),
                kind: StockAdjustment::Subtract,
                change: 2
            })
        );
        assert_eq!(Command::parse("exit"), Ok(Command::Quit));
    }

    #[test]
    fn rejects_malformed_commands() {
        assert!(Command::parse("page two").is_err());
        assert!(Command::parse("order sideways").is_err());
        assert!(Command::parse("stock p-1 steal 2").is_err());
        assert!(Command::parse("launch").is_err());
    }
}
