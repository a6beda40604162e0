pub mod fixture_routes;
