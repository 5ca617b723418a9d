use utoipa::{
    Modify, OpenApi,
    openapi::{
        self, OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    classifier::{
        Classification, Engine,
        heuristic::SkinTypeScores,
        training::{DatasetStats, ModelInfo, TrainingConfig, TrainingInfo},
    },
    dto::{
        analysis::{AnalysisRequest, AnalysisResponse, RecommendedProduct, ScanSaveRequest},
        auth::{LoginRequest, SessionResponse, SessionUser},
        catalog::{
            CreateBrandRequest, CreateCategoryRequest, CreateIngredientRequest,
            UpdateBrandRequest, UpdateCategoryRequest, UpdateIngredientRequest, WeightsPatch,
        },
        products::{CreateProductRequest, ProductDetail, PublicProduct, UpdateProductRequest},
        reports::{ConditionCount, DateRange, LogQuery, ProductCount, ReportSummary},
        rules::{
            CreateRecommendationRequest, CreateRuleRequest, RecommendationView,
            UpdateRecommendationRequest, UpdateRuleRequest,
        },
    },
    middleware::auth::SESSION_COOKIE,
    models::{
        AnalysisLog, Brand, Ingredient, NameRef, Product, ProductCategory, ProductWithRefs, Rule,
        RuleProduct, RuleWithProduct, SkinType,
    },
    response::{ApiResponse, Meta},
    routes::{analysis, auth, catalog, health, params, products, reports, rules},
    skin::{ConditionScores, ConditionWeights, SkinCondition},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "admin_session",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::session,
        auth::logout,
        analysis::submit_analysis,
        analysis::save_from_scan,
        analysis::scan,
        analysis::recommendation,
        analysis::training_info,
        products::public_products,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        catalog::list_brands,
        catalog::get_brand,
        catalog::create_brand,
        catalog::update_brand,
        catalog::delete_brand,
        catalog::list_categories,
        catalog::get_category,
        catalog::create_category,
        catalog::update_category,
        catalog::delete_category,
        catalog::list_ingredients,
        catalog::get_ingredient,
        catalog::create_ingredient,
        catalog::update_ingredient,
        catalog::delete_ingredient,
        rules::list_rules,
        rules::get_rule,
        rules::create_rule,
        rules::update_rule,
        rules::delete_rule,
        rules::list_recommendations,
        rules::get_recommendation,
        rules::create_recommendation,
        rules::update_recommendation,
        rules::delete_recommendation,
        rules::list_skin_types,
        rules::get_skin_type,
        reports::list_logs,
        reports::get_log,
        reports::delete_log,
        reports::summary,
        reports::export_csv,
        reports::export_json,
        reports::export_xlsx,
        reports::export_pdf
    ),
    components(
        schemas(
            SkinCondition,
            ConditionScores,
            ConditionWeights,
            Brand,
            ProductCategory,
            Ingredient,
            Product,
            NameRef,
            ProductWithRefs,
            Rule,
            RuleProduct,
            RuleWithProduct,
            SkinType,
            AnalysisLog,
            LoginRequest,
            SessionUser,
            SessionResponse,
            AnalysisRequest,
            ScanSaveRequest,
            AnalysisResponse,
            RecommendedProduct,
            Classification,
            Engine,
            SkinTypeScores,
            TrainingInfo,
            TrainingConfig,
            ModelInfo,
            DatasetStats,
            analysis::ScanUpload,
            CreateBrandRequest,
            UpdateBrandRequest,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CreateIngredientRequest,
            UpdateIngredientRequest,
            WeightsPatch,
            CreateProductRequest,
            UpdateProductRequest,
            ProductDetail,
            PublicProduct,
            CreateRuleRequest,
            UpdateRuleRequest,
            CreateRecommendationRequest,
            UpdateRecommendationRequest,
            RecommendationView,
            DateRange,
            LogQuery,
            ConditionCount,
            ProductCount,
            ReportSummary,
            params::Pagination,
            Meta,
            ApiResponse<AnalysisResponse>,
            ApiResponse<Classification>,
            ApiResponse<ReportSummary>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Admin sign-in and session"),
        (name = "Analysis", description = "Skin analysis, image scan and advice"),
        (name = "Products", description = "Product catalog"),
        (name = "Catalog", description = "Brands, categories and ingredients"),
        (name = "Rules", description = "Recommendation rules and advice"),
        (name = "Reports", description = "Analysis logs, summaries and exports"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
