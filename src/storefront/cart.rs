use super::client::Recipe;

/// Sync status of a cart line against the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSync {
    /// Optimistic local mutation; the matching server write has not been
    /// acknowledged yet.
    Pending,
    Confirmed,
}

#[derive(Debug, Clone)]
pub struct CartLine {
    pub recipe_id: i32,
    pub count: i32,
    pub sync: LineSync,
}

/// The shopper's in-memory cart. It lives only for the session and is
/// discarded when the cart view closes.
#[derive(Debug, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn count_of(&self, recipe_id: i32) -> Option<i32> {
        self.lines
            .iter()
            .find(|line| line.recipe_id == recipe_id)
            .map(|line| line.count)
    }

    fn line_mut(&mut self, recipe_id: i32) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.recipe_id == recipe_id)
    }

    /// "+ Add" on a recipe card: insert the line or bump its count. Returns
    /// the new count; the line is pending until the server write lands.
    pub fn add(&mut self, recipe_id: i32) -> i32 {
        match self.line_mut(recipe_id) {
            Some(line) => {
                line.count += 1;
                line.sync = LineSync::Pending;
                line.count
            }
            None => {
                self.lines.push(CartLine {
                    recipe_id,
                    count: 1,
                    sync: LineSync::Pending,
                });
                1
            }
        }
    }

    /// "+" in the cart view; only works on lines already present.
    pub fn increase(&mut self, recipe_id: i32) -> Option<i32> {
        let line = self.line_mut(recipe_id)?;
        line.count += 1;
        line.sync = LineSync::Pending;
        Some(line.count)
    }

    /// "-" in the cart view; floors at a count of one and never removes the
    /// line. Returns `None` when the decrement was refused.
    pub fn decrease(&mut self, recipe_id: i32) -> Option<i32> {
        let line = self.line_mut(recipe_id)?;
        if line.count <= 1 {
            return None;
        }
        line.count -= 1;
        line.sync = LineSync::Pending;
        Some(line.count)
    }

    pub fn confirm(&mut self, recipe_id: i32) {
        if let Some(line) = self.line_mut(recipe_id) {
            line.sync = LineSync::Confirmed;
        }
    }

    /// Undo an optimistic mutation after a failed server write. `previous` is
    /// the count the line had before the mutation; `None` removes a line that
    /// did not exist yet.
    pub fn restore(&mut self, recipe_id: i32, previous: Option<i32>) {
        match previous {
            Some(count) => {
                if let Some(line) = self.line_mut(recipe_id) {
                    line.count = count;
                    line.sync = LineSync::Confirmed;
                }
            }
            None => self.lines.retain(|line| line.recipe_id != recipe_id),
        }
    }

    /// Σ price × count over all lines; recipes missing from the catalogue
    /// price as zero, and the empty cart totals zero.
    pub fn total_price(&self, catalogue: &[Recipe]) -> f64 {
        self.lines
            .iter()
            .map(|line| {
                let price = catalogue
                    .iter()
                    .find(|recipe| recipe.id == line.recipe_id)
                    .map(|recipe| recipe.price)
                    .unwrap_or(0.0);
                price * line.count as f64
            })
            .sum()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: i32, price: f64) -> Recipe {
        Recipe {
            id,
            name: format!("Recipe {id}"),
            description: String::new(),
            cooking_instructions: String::new(),
            price,
            quantity: 0,
        }
    }

    #[test]
    fn adding_a_new_recipe_starts_at_one() {
        let mut cart = Cart::default();

        assert_eq!(cart.add(1), 1);
        assert_eq!(cart.count_of(1), Some(1));
        assert_eq!(cart.lines()[0].sync, LineSync::Pending);
    }

    #[test]
    fn adding_an_existing_recipe_increments() {
        let mut cart = Cart::default();
        cart.add(1);
        cart.confirm(1);

        assert_eq!(cart.add(1), 2);
        assert_eq!(cart.count_of(1), Some(2));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn decrease_floors_at_one() {
        let mut cart = Cart::default();
        cart.add(1);

        assert_eq!(cart.decrease(1), None);
        assert_eq!(cart.count_of(1), Some(1));
    }

    #[test]
    fn decrease_above_one_decrements() {
        let mut cart = Cart::default();
        cart.add(1);
        cart.add(1);

        assert_eq!(cart.decrease(1), Some(1));
    }

    #[test]
    fn increase_needs_an_existing_line() {
        let mut cart = Cart::default();

        assert_eq!(cart.increase(7), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn restore_removes_a_line_that_did_not_exist() {
        let mut cart = Cart::default();
        cart.add(1);

        cart.restore(1, None);
        assert!(cart.is_empty());
    }

    #[test]
    fn restore_resets_the_previous_count() {
        let mut cart = Cart::default();
        cart.add(1);
        cart.add(1);
        cart.add(1);

        cart.restore(1, Some(2));
        assert_eq!(cart.count_of(1), Some(2));
        assert_eq!(cart.lines()[0].sync, LineSync::Confirmed);
    }

    #[test]
    fn total_price_sums_over_lines() {
        let catalogue = vec![recipe(1, 12.5), recipe(2, 4.0)];
        let mut cart = Cart::default();
        cart.add(1);
        cart.add(1);
        cart.add(2);

        assert_eq!(cart.total_price(&catalogue), 29.0);
    }

    #[test]
    fn empty_cart_totals_zero() {
        let catalogue = vec![recipe(1, 12.5)];
        let cart = Cart::default();

        assert_eq!(cart.total_price(&catalogue), 0.0);
    }

    #[test]
    fn unknown_recipes_price_as_zero() {
        let mut cart = Cart::default();
        cart.add(99);

        assert_eq!(cart.total_price(&[]), 0.0);
    }
}
