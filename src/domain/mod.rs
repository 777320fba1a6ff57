// ドメイン層 - 探索状態と検索設定

pub mod forest;
pub mod search;
