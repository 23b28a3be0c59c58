use fieldmapper::mappers;

mappers! {
  #[mapper(sub::OriginModel, DestinationModel, DestinationModel2)]
  #[derive(Debug, Clone, PartialEq)]
  pub struct OriginModel {
    pub id: i64,
    pub name: String,
    pub budget: i64,
    pub remains: Option<i64>,
    pub loan: Option<i64>,
  }

  #[derive(Debug, Clone, PartialEq)]
  pub struct DestinationModel {
    pub id: i64,
    pub name: String,
    pub budget: i64,
    pub remains: Option<i64>,
    pub loan: Option<i64>,
    pub rich: bool,
  }

  #[derive(Debug, Clone, PartialEq)]
  pub struct DestinationModel2 {
    pub id: i64,
    pub name: String,
    pub budget: i64,
    pub remains: Option<i64>,
    pub loan: Option<i64>,
    pub rich: bool,
    pub happy: Option<bool>,
  }

  /// Same shape, different currency type for `budget`.
  #[derive(Debug, Clone, PartialEq)]
  pub struct Invoice {
    pub id: i64,
    pub budget: u64,
  }

  pub mod sub {
    #[mapper(super::DestinationModel, super::Invoice)]
    #[derive(Debug, Clone, PartialEq)]
    pub struct OriginModel {
      pub id: i64,
      pub name: String,
      pub budget: i64,
      pub remains: Option<i64>,
      pub loan: Option<i64>,
    }
  }

  pub mod ledger {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Money(pub i64);

    #[mapper(Statement, super::audit::Entry)]
    #[derive(Debug, Clone, PartialEq)]
    pub struct Account {
      pub owner: String,
      pub balance: Money,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Statement {
      pub owner: String,
      pub balance: Money,
      pub closed: bool,
    }
  }

  pub mod audit {
    /// Not the same type as `ledger::Money`.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Money(pub u64);

    #[derive(Debug, Clone, PartialEq)]
    pub struct Entry {
      pub owner: String,
      pub balance: Money,
    }
  }
}
