pub mod app;

pub mod common {
    pub mod chance;
    pub mod config;
    pub mod error;
    pub mod event;
    pub mod money;
}

pub mod domain {
    pub mod account;
    pub mod catalog;
    pub mod ledger;
    pub mod transaction;
}

pub mod atm {
    pub(crate) mod handlers {
        pub mod deposit;
        pub mod inquiry;
        pub mod transfer;
        pub mod withdrawal;
    }
    pub mod processor;
    pub mod session;
    #[cfg(test)]
    pub(crate) mod test_support;
}

pub mod io {
    pub mod printer;
    pub mod reader;
    pub mod writer;
}
