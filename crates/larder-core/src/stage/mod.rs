pub mod forecast;
pub mod ingredients;
pub mod sales;
pub mod shipments;

pub use forecast::stage_forecast;
pub use ingredients::stage_ingredients;
pub use sales::stage_sales;
pub use shipments::stage_shipments;
