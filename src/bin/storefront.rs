//! Terminal storefront: browse the catalogue, build a cart and place an
//! order against a running catalogue service.

use std::io::{BufRead, Write};

use anyhow::Result;
use meals_storefront::{
    bootstrap,
    storefront::{Storefront, StorefrontClient, View},
};

#[tokio::main]
async fn main() -> Result<()> {
    bootstrap::init_tracing();
    bootstrap::init_env();

    let base_url = std::env::var("STOREFRONT_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());
    let mut shop = Storefront::new(StorefrontClient::new(base_url));

    shop.load_catalogue().await;
    print_catalogue(&shop);
    println!();
    println!("Commands: add <id> | inc <id> | dec <id> | cart | close | checkout");
    println!("          name|email|address|mobile <value> | order | menu | quit");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = stdin.lock().lines().next() else {
            break;
        };
        let line = line?;
        let (command, arg) = match line.trim().split_once(' ') {
            Some((command, arg)) => (command, arg.trim()),
            None => (line.trim(), ""),
        };

        match command {
            "add" | "inc" | "dec" => match arg.parse::<i32>() {
                Ok(id) => {
                    match command {
                        "add" => shop.add_to_cart(id).await,
                        "inc" => shop.increase_quantity(id).await,
                        _ => shop.decrease_quantity(id).await,
                    }
                    println!(
                        "Recipe {id}: x{}",
                        shop.cart().count_of(id).unwrap_or(0)
                    );
                }
                Err(_) => println!("Expected a recipe id"),
            },
            "cart" => {
                shop.open_cart();
                print_cart(&shop);
            }
            "close" => match shop.view() {
                View::CheckoutOpen => shop.close_checkout(),
                _ => shop.close_cart(),
            },
            "checkout" => {
                shop.open_cart();
                shop.open_checkout();
                println!("Enter customer details, then `order`.");
            }
            "name" => shop.customer_mut().name = arg.to_string(),
            "email" => shop.customer_mut().email = arg.to_string(),
            "address" => shop.customer_mut().address = arg.to_string(),
            "mobile" => shop.customer_mut().mobile_number = arg.to_string(),
            "order" => {
                if shop.place_order().await {
                    println!("Thank you for the order");
                } else {
                    println!("Placing the order failed, please try again");
                }
            }
            "menu" => print_catalogue(&shop),
            "quit" | "exit" => break,
            "" => {}
            other => println!("Unknown command: {other}"),
        }
    }

    Ok(())
}

fn print_catalogue(shop: &Storefront) {
    if shop.catalogue().is_empty() {
        println!("No recipes found.");
        return;
    }

    for recipe in shop.catalogue() {
        println!(
            "#{} {} - ${} ({})",
            recipe.id, recipe.name, recipe.price, recipe.description
        );
    }
}

fn print_cart(shop: &Storefront) {
    if shop.cart().is_empty() {
        println!("Your cart is empty.");
        return;
    }

    for line in shop.cart().lines() {
        let name = shop
            .catalogue()
            .iter()
            .find(|recipe| recipe.id == line.recipe_id)
            .map(|recipe| recipe.name.as_str())
            .unwrap_or("(unknown)");
        println!("{name} x{}", line.count);
    }
    println!("Total Price: ${}", shop.total_price());
}
