pub mod form_service;
