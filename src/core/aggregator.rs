use crate::core::classifier::Classifier;
use crate::core::{
    Address, AuctionSale, CapabilityProfile, CollectionMetadata, CompositeRecord, FlatPriceSale,
    Participation, RecordAddress, RecordQuery, RecordSource, RevealSchedule, SaleParameters,
};
use crate::domain::query::{AuctionField, CollectionField, FlatField, ParticipationField, RevealField};
use crate::utils::error::{LensError, Result};
use futures_util::try_join;
use std::sync::Arc;

/// 針對單一 record 組裝完整檢視
///
/// 所有欄位讀取彼此獨立並同時發出；任何一筆失敗都會讓整個 `aggregate` 失敗，
/// 不會回傳部分結果。
pub struct Aggregator<S: RecordSource> {
    classifier: Classifier<S>,
}

impl<S: RecordSource> Clone for Aggregator<S> {
    fn clone(&self) -> Self {
        Self {
            classifier: self.classifier.clone(),
        }
    }
}

impl<S: RecordSource> Aggregator<S> {
    pub fn new(classifier: Classifier<S>) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &Classifier<S> {
        &self.classifier
    }

    fn source(&self) -> &Arc<S> {
        self.classifier.source()
    }

    pub async fn aggregate(
        &self,
        record: RecordAddress,
        requester: Option<Address>,
    ) -> Result<CompositeRecord> {
        let profile = self.classifier.classify(&record).await;
        if profile == CapabilityProfile::Unrecognized {
            tracing::debug!("Record {} is unrecognized, skipping reads", record);
            return Err(LensError::UnrecognizedRecord { record });
        }

        tracing::debug!("Aggregating {} as {}", record, profile);

        let (metadata, reveal, sale, participation) = try_join!(
            self.read_metadata(&record),
            self.read_reveal(&record),
            self.read_sale(&record, profile),
            self.read_participation(&record, requester),
        )?;

        Ok(CompositeRecord {
            record,
            metadata,
            reveal,
            sale,
            participation,
        })
    }

    async fn uint(&self, record: &RecordAddress, query: RecordQuery) -> Result<u128> {
        self.source().read(record, query).await?.into_uint(record, &query)
    }

    async fn text(&self, record: &RecordAddress, query: RecordQuery) -> Result<String> {
        self.source().read(record, query).await?.into_text(record, &query)
    }

    async fn phase(&self, record: &RecordAddress, query: RecordQuery) -> Result<u8> {
        self.source().read(record, query).await?.into_phase(record, &query)
    }

    async fn read_metadata(&self, record: &RecordAddress) -> Result<CollectionMetadata> {
        use CollectionField::*;
        let q = RecordQuery::Collection;

        let (name, symbol, collection_size, max_batch_size, total_supply, unrevealed_uri, base_uri) = try_join!(
            self.text(record, q(Name)),
            self.text(record, q(Symbol)),
            self.uint(record, q(CollectionSize)),
            self.uint(record, q(MaxBatchSize)),
            self.uint(record, q(TotalSupply)),
            self.text(record, q(UnrevealedUri)),
            self.text(record, q(BaseUri)),
        )?;

        Ok(CollectionMetadata {
            name,
            symbol,
            collection_size,
            max_batch_size,
            total_supply,
            unrevealed_uri,
            base_uri,
        })
    }

    async fn read_reveal(&self, record: &RecordAddress) -> Result<RevealSchedule> {
        let q = RecordQuery::Reveal;

        let (reveal_batch_size, last_token_revealed, reveal_start_time, reveal_interval) = try_join!(
            self.uint(record, q(RevealField::BatchSize)),
            self.uint(record, q(RevealField::LastTokenRevealed)),
            self.uint(record, q(RevealField::StartTime)),
            self.uint(record, q(RevealField::Interval)),
        )?;

        Ok(RevealSchedule {
            reveal_batch_size,
            last_token_revealed,
            reveal_start_time,
            reveal_interval,
        })
    }

    async fn read_sale(
        &self,
        record: &RecordAddress,
        profile: CapabilityProfile,
    ) -> Result<SaleParameters> {
        match profile {
            CapabilityProfile::AuctionStyle => {
                Ok(SaleParameters::AuctionStyle(self.read_auction(record).await?))
            }
            CapabilityProfile::FlatPriceStyle => {
                Ok(SaleParameters::FlatPriceStyle(self.read_flat(record).await?))
            }
            CapabilityProfile::Unrecognized => Err(LensError::UnrecognizedRecord { record: *record }),
        }
    }

    async fn read_auction(&self, record: &RecordAddress) -> Result<AuctionSale> {
        use AuctionField::*;
        let q = RecordQuery::Auction;

        // 目前拍賣價格需要以拍賣起始時間向 record 查詢
        let schedule_and_price = async {
            let auction_start_time = self.uint(record, q(AuctionStartTime)).await?;
            let auction_price = self
                .uint(record, q(AuctionPrice { start_time: auction_start_time }))
                .await?;
            Ok::<_, LensError>((auction_start_time, auction_price))
        };

        let allocations = async {
            try_join!(
                self.uint(record, q(AmountForAuction)),
                self.uint(record, q(AmountForAllowlist)),
                self.uint(record, q(AmountForDevs)),
            )
        };

        let phase_starts = async {
            try_join!(
                self.uint(record, q(AllowlistStartTime)),
                self.uint(record, q(PublicSaleStartTime)),
            )
        };

        let curve = async {
            try_join!(
                self.uint(record, q(StartPrice)),
                self.uint(record, q(EndPrice)),
                self.uint(record, q(PriceCurveLength)),
                self.uint(record, q(DropInterval)),
                self.uint(record, q(DropPerStep)),
            )
        };

        let pricing = async {
            try_join!(
                self.uint(record, q(AllowlistDiscountPercent)),
                self.uint(record, q(PublicSaleDiscountPercent)),
                self.uint(record, q(AllowlistPrice)),
                self.uint(record, q(PublicSalePrice)),
            )
        };

        let progress = async {
            try_join!(
                self.phase(record, q(CurrentPhase)),
                self.uint(record, q(MintedDuringAuction)),
                self.uint(record, q(MintedDuringAllowlist)),
                self.uint(record, q(MintedDuringPublicSale)),
                self.uint(record, q(LastAuctionPrice)),
            )
        };

        let (
            (auction_start_time, auction_price),
            (amount_for_auction, amount_for_allowlist, amount_for_devs),
            (allowlist_start_time, public_sale_start_time),
            (auction_start_price, auction_end_price, auction_price_curve_length, auction_drop_interval, auction_drop_per_step),
            (allowlist_discount_percent, public_sale_discount_percent, allowlist_price, public_sale_price),
            (current_phase, minted_during_auction, minted_during_allowlist, minted_during_public_sale, last_auction_price),
        ) = try_join!(schedule_and_price, allocations, phase_starts, curve, pricing, progress)?;

        Ok(AuctionSale {
            current_phase,
            amount_for_auction,
            amount_for_allowlist,
            amount_for_devs,
            auction_start_time,
            allowlist_start_time,
            public_sale_start_time,
            auction_start_price,
            auction_end_price,
            auction_price_curve_length,
            auction_drop_interval,
            auction_drop_per_step,
            allowlist_discount_percent,
            public_sale_discount_percent,
            auction_price,
            allowlist_price,
            public_sale_price,
            minted_during_auction,
            minted_during_allowlist,
            minted_during_public_sale,
            last_auction_price,
        })
    }

    async fn read_flat(&self, record: &RecordAddress) -> Result<FlatPriceSale> {
        use FlatField::*;
        let q = RecordQuery::Flat;

        let (
            current_phase,
            amount_for_allowlist,
            amount_for_devs,
            allowlist_start_time,
            public_sale_start_time,
            allowlist_price,
            public_sale_price,
            minted_during_allowlist,
            minted_during_public_sale,
        ) = try_join!(
            self.phase(record, q(CurrentPhase)),
            self.uint(record, q(AmountForAllowlist)),
            self.uint(record, q(AmountForDevs)),
            self.uint(record, q(AllowlistStartTime)),
            self.uint(record, q(PublicSaleStartTime)),
            self.uint(record, q(AllowlistPrice)),
            self.uint(record, q(SalePrice)),
            self.uint(record, q(MintedDuringAllowlist)),
            self.uint(record, q(MintedDuringPublicSale)),
        )?;

        Ok(FlatPriceSale {
            current_phase,
            amount_for_allowlist,
            amount_for_devs,
            allowlist_start_time,
            public_sale_start_time,
            allowlist_price,
            public_sale_price,
            minted_during_allowlist,
            minted_during_public_sale,
        })
    }

    async fn read_participation(
        &self,
        record: &RecordAddress,
        requester: Option<Address>,
    ) -> Result<Option<Participation>> {
        let Some(requester) = requester else {
            return Ok(None);
        };

        let q = |field| RecordQuery::Participation(field, requester);
        let (balance, number_minted, allowlist_allowance) = try_join!(
            self.uint(record, q(ParticipationField::Balance)),
            self.uint(record, q(ParticipationField::NumberMinted)),
            self.uint(record, q(ParticipationField::AllowlistAllowance)),
        )?;

        Ok(Some(Participation {
            requester,
            balance,
            number_minted,
            allowlist_allowance,
        }))
    }
}
